//! Errors raised while reading scene input.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading models or scene descriptions.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load OBJ {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("Invalid scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No geometry found in {0}")]
    NoGeometry(PathBuf),

    #[error("Scene description does not name a model")]
    MissingModel,
}

pub type CoreResult<T> = Result<T, CoreError>;
