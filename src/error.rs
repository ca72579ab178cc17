//! Errors surfaced by the outer shell (config, maps, logging, window).
//! Ray casting, doors and movement never fail.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("map has no rows")]
    EmptyMap,

    #[error("map has no free cell to spawn in")]
    NoSpawn,

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("graphics setup failed: {0}")]
    Graphics(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
