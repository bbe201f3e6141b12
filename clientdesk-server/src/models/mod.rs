//! Request-boundary models
//!
//! All user input is checked before it reaches the store.
//! Invalid input returns ValidationError, not panic.

pub mod json;
pub mod record;
pub mod validation;

pub use json::{bson_to_json, document_to_json, json_to_document};
pub use record::{
    check_record, parse_app_id, parse_object_id, FieldKind, FieldRule, APP_ID_FIELD,
    DATABASE_ID_FIELD,
};
pub use validation::ValidationError;
