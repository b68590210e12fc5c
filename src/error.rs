use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised at the edges of the engine: configuration, catalog data,
/// tick streams and the performance log. The tracking core itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "invalid profile '{name}': down threshold {down} must be greater than up threshold {up}"
    )]
    InvalidProfile { name: String, down: f64, up: f64 },

    #[error("invalid setting {name} = {value}: {reason}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("unknown exercise: {0}")]
    UnknownExercise(String),

    #[error("duplicate exercise in catalog: {0}")]
    DuplicateExercise(String),

    #[error("catalog file {path}: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("tick stream line {line}: {source}")]
    Stream {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("performance log: {0}")]
    Log(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
