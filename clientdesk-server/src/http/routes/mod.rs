//! Route handlers organized by resource

pub mod clients;
pub mod employees;
pub mod health;
pub mod resource;

pub use resource::Resource;
