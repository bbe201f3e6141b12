//! JSON <-> BSON conversion at the HTTP boundary

use bson::{Bson, Document};
use serde_json::{Map, Value};

use super::ValidationError;

/// Convert a request body into a BSON document.
///
/// Integers become 64-bit integers; integers beyond `i64` are rejected.
pub fn json_to_document(body: &Map<String, Value>) -> Result<Document, ValidationError> {
    bson::to_document(body).map_err(|e| ValidationError::Unrepresentable {
        reason: e.to_string(),
    })
}

/// Render a stored document as JSON.
pub fn document_to_json(document: Document) -> Value {
    bson_to_json(Bson::Document(document))
}

/// ObjectIds render as hex strings and datetimes as RFC 3339; everything
/// else uses relaxed extended JSON.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Value::from(dt.timestamp_millis()),
        },
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}
