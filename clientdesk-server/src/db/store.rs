//! Collection access traits shared by the MongoDB and in-memory stores

use std::sync::Arc;

use async_trait::async_trait;
use bson::{Bson, Document};
use serde::Serialize;

use super::DbError;

/// A database that hands out collections by name.
///
/// Unknown names are not an error: they yield an empty collection.
pub trait DocumentStore: Send + Sync {
    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection>;

    /// Short label for logs and health output ("mongodb", "memory").
    fn kind(&self) -> &'static str;
}

/// Operations the HTTP layer performs against one collection.
///
/// Filters are equality filters on top-level fields.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// All documents, ascending by `sort_key`.
    async fn find_sorted(&self, sort_key: &str) -> Result<Vec<Document>, DbError>;

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, DbError>;

    /// Insert and return the identifier the database assigned.
    async fn insert_one(&self, document: Document) -> Result<Bson, DbError>;

    /// Merge `fields` into the first matching document (`$set`).
    async fn update_one(
        &self,
        filter: Document,
        fields: Document,
    ) -> Result<UpdateSummary, DbError>;

    async fn delete_one(&self, filter: Document) -> Result<DeleteSummary, DbError>;
}

/// Outcome of an update, shaped like the driver's result document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummary {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
    pub upserted_count: u64,
}

impl UpdateSummary {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_id: None,
            upserted_count: 0,
        }
    }
}

/// Outcome of a delete. Zero deletions is still a success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteSummary {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_summary_json_shape() {
        let value = serde_json::to_value(UpdateSummary::new(1, 0)).unwrap();
        assert_eq!(
            value,
            json!({
                "acknowledged": true,
                "matchedCount": 1,
                "modifiedCount": 0,
                "upsertedId": null,
                "upsertedCount": 0
            })
        );
    }

    #[test]
    fn delete_summary_json_shape() {
        let value = serde_json::to_value(DeleteSummary::new(0)).unwrap();
        assert_eq!(value, json!({ "acknowledged": true, "deletedCount": 0 }));
    }
}
