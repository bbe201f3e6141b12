//! Per-collection record rules and path identifier parsing
//!
//! Documents stay schema-less: only declared fields are type-checked, and
//! only when present. Anything else passes through to the database as-is.

use bson::oid::ObjectId;
use serde_json::{Map, Value};

use super::ValidationError;

/// Field the database assigns on insert
pub const DATABASE_ID_FIELD: &str = "_id";

/// Caller-supplied numeric identifier used by the read routes
pub const APP_ID_FIELD: &str = "id";

/// JSON type a declared field must have when present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Number,
    String,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::String => value.is_string(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Integer => "an integer",
            Self::Number => "a number",
            Self::String => "a string",
        }
    }
}

/// A declared field and its kind
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldRule {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Check a request body against a collection's rules.
///
/// # Rules
/// - `_id` may never be supplied
/// - Each declared field, when present, must have its declared kind
pub fn check_record(body: &Map<String, Value>, rules: &[FieldRule]) -> Result<(), ValidationError> {
    if body.contains_key(DATABASE_ID_FIELD) {
        return Err(ValidationError::Reserved {
            field: DATABASE_ID_FIELD,
        });
    }

    for rule in rules {
        if let Some(value) = body.get(rule.name) {
            if !rule.kind.accepts(value) {
                return Err(ValidationError::WrongType {
                    field: rule.name.to_owned(),
                    expected: rule.kind.describe(),
                });
            }
        }
    }

    Ok(())
}

/// Parse an application id the lenient way the read routes always have.
///
/// Leading whitespace and one sign are allowed, then the leading run of
/// digits is taken ("12abc" is 12). No leading digits means no id at all,
/// which callers treat as "matches nothing".
///
/// # Example
/// ```
/// use clientdesk_server::models::parse_app_id;
///
/// assert_eq!(parse_app_id("42"), Some(42));
/// assert_eq!(parse_app_id("7days"), Some(7));
/// assert_eq!(parse_app_id("abc"), None);
/// ```
pub fn parse_app_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() {
        return None;
    }

    let magnitude: i64 = digits.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse a database identifier (24 hex characters).
pub fn parse_object_id(raw: &str) -> Result<ObjectId, ValidationError> {
    ObjectId::parse_str(raw).map_err(|_| ValidationError::InvalidFormat {
        field: "id",
        reason: "must be a 24-character hex object id",
    })
}
