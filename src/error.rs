// Framesight Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FramesightError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("FFprobe error: {0}")]
    FFprobe(String),

    #[error("FFmpeg error: {0}")]
    FFmpeg(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Frame interval must be at least 1 second")]
    InvalidInterval,

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for FramesightError {
    fn from(err: anyhow::Error) -> Self {
        FramesightError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FramesightError>;
