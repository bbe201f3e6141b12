//! Command implementations for the clientdesk CLI

pub mod serve;

pub use serve::run_serve;
