// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod board;
pub mod config;
pub mod content;
pub mod controller;
pub mod countdown;
pub mod difficulty;
pub mod error;
pub mod fetch;
pub mod game;
pub mod logging;
pub mod runtime;
pub mod stats;
pub mod theme;
