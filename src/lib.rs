pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod export;
pub mod orchestration;
pub mod store;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{Decimal, OperationInput, OperationRecord};
pub use engine::{
    CapitalAnchor, LedgerEngine, LedgerError, LedgerRules, ResultRule, Summary, ZeroResultPolicy,
};
pub use error::AppError;
pub use export::{write_csv, ExportFormat, ExportRow, EXPORT_COLUMNS};
pub use orchestration::{LedgerSession, SessionError};
pub use store::{KeyValueStore, MemoryStore, StoreError};
