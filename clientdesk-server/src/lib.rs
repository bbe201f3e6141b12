//! clientdesk-server: HTTP endpoints over the client and employee collections
//!
//! Receives JSON over HTTP, forwards one query or update per request to a
//! MongoDB database and answers with the result as JSON.

pub mod db;
pub mod http;
pub mod models;

pub use db::{DbError, DbHandle, MongoConfig};
pub use http::{build_router, run_server, ApiError, ServerConfig};
