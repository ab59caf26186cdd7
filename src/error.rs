use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A value parsed fine but cannot drive a simulation.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("window error: {0}")]
    Window(#[from] minifb::Error),

    #[error("failed to install Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("physics thread panicked")]
    PhysicsThread,

    #[error("invalid argument: {0}")]
    Args(String),
}

pub type AppResult<T> = Result<T, AppError>;
