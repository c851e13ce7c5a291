pub mod session;

pub use session::{LedgerSession, SessionError};
