use crate::config::ConfigError;
use crate::export::ExportError;
use crate::orchestration::SessionError;
use crate::store::StoreError;
use thiserror::Error;

/// Top-level error for the report binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Ledger error: {0}")]
    Session(#[from] SessionError),
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Store(StoreError::Db(err))
    }
}
