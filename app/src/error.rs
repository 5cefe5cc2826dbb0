//! FILENAME: app/src/error.rs

use forest_engine::LayoutError;
use forest_render::RenderError;
use persistence::PersistenceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No table loaded; call load_data first")]
    NoTableLoaded,

    #[error("Nothing to save; call plot first")]
    NotPlotted,

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
