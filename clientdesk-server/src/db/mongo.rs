//! MongoDB-backed document store

use std::sync::Arc;

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use super::store::{DeleteSummary, DocumentCollection, DocumentStore, UpdateSummary};
use super::DbError;

/// Store bound to one MongoDB database
#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Get the database name
    pub fn db_name(&self) -> &str {
        self.database.name()
    }
}

impl DocumentStore for MongoStore {
    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection> {
        Arc::new(MongoCollection {
            inner: self.database.collection::<Document>(name),
        })
    }

    fn kind(&self) -> &'static str {
        "mongodb"
    }
}

/// Untyped collection handle
#[derive(Debug, Clone)]
pub struct MongoCollection {
    inner: Collection<Document>,
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    async fn find_sorted(&self, sort_key: &str) -> Result<Vec<Document>, DbError> {
        let mut sort = Document::new();
        sort.insert(sort_key, 1);

        let cursor = self.inner.find(doc! {}).sort(sort).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, DbError> {
        Ok(self.inner.find_one(filter).await?)
    }

    async fn insert_one(&self, document: Document) -> Result<Bson, DbError> {
        let result = self.inner.insert_one(document).await?;
        match result.inserted_id {
            Bson::Null => Err(DbError::MissingInsertedId),
            id => Ok(id),
        }
    }

    async fn update_one(
        &self,
        filter: Document,
        fields: Document,
    ) -> Result<UpdateSummary, DbError> {
        let result = self
            .inner
            .update_one(filter, doc! { "$set": fields })
            .await?;

        let mut summary = UpdateSummary::new(result.matched_count, result.modified_count);
        if let Some(id) = result.upserted_id {
            summary.upserted_id = Some(match id {
                Bson::ObjectId(oid) => oid.to_hex(),
                other => other.to_string(),
            });
            summary.upserted_count = 1;
        }
        Ok(summary)
    }

    async fn delete_one(&self, filter: Document) -> Result<DeleteSummary, DbError> {
        let result = self.inner.delete_one(filter).await?;
        Ok(DeleteSummary::new(result.deleted_count))
    }
}
