//! Validation error types

use std::fmt;

/// Validation error for request input
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Body is not a JSON object
    NotAnObject,

    /// Body could not be parsed as JSON at all
    MalformedJson { reason: String },

    /// Declared field has the wrong JSON type
    WrongType { field: String, expected: &'static str },

    /// Field the caller may not set
    Reserved { field: &'static str },

    /// String doesn't match required format (e.g., ObjectId)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Value is JSON but cannot be stored (e.g., integer beyond i64)
    Unrepresentable { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "request body must be a JSON object"),
            Self::MalformedJson { reason } => write!(f, "malformed JSON body: {}", reason),
            Self::WrongType { field, expected } => {
                write!(f, "field '{}' must be {}", field, expected)
            }
            Self::Reserved { field } => {
                write!(f, "field '{}' is assigned by the database and cannot be set", field)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::Unrepresentable { reason } => write!(f, "unsupported value: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}
