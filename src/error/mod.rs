use thiserror::Error;

use crate::notification::PayloadError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid payload document: {0}")]
    Input(#[from] serde_json::Error),

    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),
}

impl AppError {
    /// Stable machine-readable code, used as a structured log field
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Input(_) => "INPUT_ERROR",
            AppError::Payload(PayloadError::ReservedKeyCollision) => "RESERVED_KEY_COLLISION",
            AppError::Payload(PayloadError::PayloadTooLarge { .. }) => "PAYLOAD_TOO_LARGE",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
