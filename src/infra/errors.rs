// src/infra/errors.rs — Error types for Foresight
//
// The engine's core operations are infallible. These variants cover the
// edges that touch the filesystem or parse external input.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForesightError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid config file: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Replay line {line}: {message}")]
    Replay { line: usize, message: String },

    #[error("Unsupported export format '{0}'. Options: json, yaml")]
    UnknownFormat(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForesightError {
    /// Input errors are the caller's fault; everything else is environmental.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ForesightError::Replay { .. }
                | ForesightError::UnknownFormat(_)
                | ForesightError::TomlDe(_)
                | ForesightError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ForesightError>;

/// Process exit code: 2 for bad input, 1 for everything else.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ForesightError>() {
        Some(e) if e.is_input_error() => 2,
        _ => 1,
    }
}
