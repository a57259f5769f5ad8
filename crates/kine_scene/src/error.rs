//! Scene error types

use kine_core::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or building a scene
#[derive(Error, Debug)]
pub enum SceneError {
    /// The configuration parsed but describes an invalid scene
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to parse TOML scene: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse JSON scene: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for scene loading
pub type Result<T> = std::result::Result<T, SceneError>;
