use thiserror::Error;

/// Failures talking to the creature API. These are logged and swallowed at the
/// fetch worker boundary; the game keeps going with whatever resolved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no official artwork for {url}")]
    MissingArtwork { url: String },
    #[error("failed to start fetch worker: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("fetch worker is no longer running")]
    WorkerGone,
}
