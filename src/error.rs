use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatrixError {
    /// A backend name or group that neither the catalog nor the group table knows
    #[error("Unknown backend: '{0}'")]
    UnknownBackend(String),

    #[error("Unknown capability: '{0}'")]
    UnknownCapability(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parsing error in '{file}': {message}")]
    ParseError { file: String, message: String },

    #[error("KDL parse error: {0}")]
    KdlError(#[from] kdl::KdlError),

    #[error("IO error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    YamlError(#[from] serde_yml::Error),

    #[error("Config file not found at: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Malformed `--option` argument or option value
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("{0} test(s) would be skipped under --strict")]
    StrictCheckFailed(usize),
}

pub type Result<T> = std::result::Result<T, MatrixError>;
