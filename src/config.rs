use std::path::PathBuf;

use crate::content::{DEFAULT_API_BASE, DEFAULT_CATALOG_LIMIT};
use crate::difficulty::Difficulty;
use crate::theme::Theme;

pub const LOG_FILE_NAME: &str = "flipdex.log";

/// Start-up settings. Nothing here is ever written back to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub theme: Theme,
    pub api_base: String,
    pub catalog_limit: usize,
    pub seed: Option<u64>,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            theme: Theme::default(),
            api_base: DEFAULT_API_BASE.to_string(),
            catalog_limit: DEFAULT_CATALOG_LIMIT,
            seed: None,
            log_file: default_log_file(),
        }
    }
}

pub fn default_log_file() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}
