use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backup file could not be parsed or is missing one of its fields
    #[error("Invalid backup file {path}: {reason}")]
    InvalidBackup { path: PathBuf, reason: String },

    /// Amounts must be finite and not negative; drinks must also be above zero
    #[error("Invalid {what}: {value}")]
    InvalidAmount { what: &'static str, value: f64 },

    #[error("Unable to determine a data directory for this platform")]
    NoDataDir,
}

pub type AppResult<T> = Result<T, AppError>;
