//! Database layer - connector, collection access and the readiness gate
//!
//! # Design Principles
//!
//! - One client per process, opened once at startup - no reconnect loop
//! - Handlers reach the store only through [`DbHandle`]
//! - Not-found is `Option`, not an error
//! - Every collection operation is a single driver call

pub mod connect;
pub mod handle;
pub mod memory;
pub mod mongo;
pub mod store;

pub use connect::{connect, MongoConfig};
pub use handle::DbHandle;
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use store::{DeleteSummary, DocumentCollection, DocumentStore, UpdateSummary};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("database not initialized")]
    NotInitialized,

    #[error("database already initialized")]
    AlreadyInitialized,

    #[error("insert did not return an identifier")]
    MissingInsertedId,
}
