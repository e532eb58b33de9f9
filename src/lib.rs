pub mod checks;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod query;
pub mod seed;
pub mod session;
pub mod storage;
pub mod tracker;

pub use error::{SessionError, StorageError, ValidationError};
pub use session::{ApplyOutcome, EarnOutcome, Session};
pub use storage::{Cache, StorageKey};
