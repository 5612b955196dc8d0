pub mod camera;
pub mod cli;
pub mod config;
pub mod fractal;
pub mod graphics;
pub mod state;
pub mod user_input;
pub mod windowing;

use std::path::PathBuf;

pub use windowing::Windowing;

/// Engine-level error type.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("renderer error: {0}")]
    Renderer(String),

    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid config {}: {reason}", path.display())]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type EngineResult<T> = Result<T, EngineError>;
