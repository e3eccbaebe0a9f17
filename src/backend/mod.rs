//! Managed-backend access.
//!
//! Every read goes through `RecordStore::select`, which returns the raw JSON
//! rows for a `Query`. `RestStore` talks to the hosted backend over HTTP;
//! `MemoryStore` evaluates the same queries over in-process tables.

pub mod memory;
pub mod query;
pub mod rest;

pub use memory::MemoryStore;
pub use query::{Filter, Query};
pub use rest::RestStore;

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Cannot connect to backend at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse backend response: {0}")]
    ResponseParsing(String),
}

/// Read access to backend tables.
///
/// Implementations may block; async callers run them on
/// `tokio::task::spawn_blocking`.
pub trait RecordStore: Send + Sync {
    /// Run a select query and return the matching rows.
    fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError>;
}
