//! Generic document resource handlers
//!
//! Every collection route is one of five operations, parameterised by a
//! [`Resource`]: collection name, label, sort key and field rules. Id
//! validation lives in the extractors, so a malformed database id can only
//! ever produce a 400.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use bson::{Bson, Document};
use serde_json::{Map, Value};

use crate::db::{DeleteSummary, DocumentCollection, UpdateSummary};
use crate::http::error::ApiError;
use crate::http::extractors::{AppIdPath, JsonObject, ValidObjectId};
use crate::http::server::AppState;
use crate::models::{
    bson_to_json, check_record, document_to_json, json_to_document, FieldRule, APP_ID_FIELD,
    DATABASE_ID_FIELD,
};

/// A document collection exposed over HTTP
pub trait Resource: Send + Sync + 'static {
    /// Collection name in the database
    const COLLECTION: &'static str;
    /// Singular name used in messages and logs
    const LABEL: &'static str;
    /// Field the list route sorts ascending by
    const SORT_KEY: &'static str;
    /// Declared fields checked on create and update
    const FIELDS: &'static [FieldRule];
}

fn collection<R: Resource>(
    state: &AppState,
    operation: &'static str,
) -> Result<Arc<dyn DocumentCollection>, ApiError> {
    let store = state
        .db
        .store()
        .map_err(|e| ApiError::database(R::LABEL, operation, e))?;
    Ok(store.collection(R::COLLECTION))
}

fn single(key: &str, value: impl Into<Bson>) -> Document {
    let mut filter = Document::new();
    filter.insert(key, value);
    filter
}

/// GET /{collection} - all documents sorted by the resource's sort key
pub async fn list<R: Resource>(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let documents = collection::<R>(&state, "list")?
        .find_sorted(R::SORT_KEY)
        .await
        .map_err(|e| ApiError::database(R::LABEL, "list", e))?;

    Ok(Json(documents.into_iter().map(document_to_json).collect()))
}

/// GET /{collection}/{id} - first document whose application id matches
pub async fn find_by_app_id<R: Resource>(
    State(state): State<Arc<AppState>>,
    AppIdPath(id): AppIdPath,
) -> Result<Json<Value>, ApiError> {
    let collection = collection::<R>(&state, "fetch")?;
    let not_found = ApiError::NotFound { resource: R::LABEL };

    let Some(id) = id else {
        tracing::debug!(resource = R::LABEL, "Path id is not numeric; nothing can match");
        return Err(not_found);
    };

    let document = collection
        .find_one(single(APP_ID_FIELD, id))
        .await
        .map_err(|e| ApiError::database(R::LABEL, "fetch", e))?
        .ok_or(not_found)?;

    Ok(Json(document_to_json(document)))
}

/// POST /{collection} - insert the body, answer with it plus its `_id`
pub async fn create<R: Resource>(
    State(state): State<Arc<AppState>>,
    JsonObject(body): JsonObject,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    check_record(&body, R::FIELDS)?;
    let document = json_to_document(&body)?;

    let inserted_id = collection::<R>(&state, "insert")?
        .insert_one(document)
        .await
        .map_err(|e| ApiError::database(R::LABEL, "insert", e))?;
    tracing::info!(resource = R::LABEL, id = %inserted_id, "Inserted document");

    let mut created = Map::with_capacity(body.len() + 1);
    created.insert(DATABASE_ID_FIELD.to_owned(), bson_to_json(inserted_id));
    created.extend(body);

    Ok((StatusCode::CREATED, Json(Value::Object(created))))
}

/// PUT /{collection}/{id} - merge the body into the document with that `_id`
pub async fn update<R: Resource>(
    State(state): State<Arc<AppState>>,
    ValidObjectId(id): ValidObjectId,
    JsonObject(body): JsonObject,
) -> Result<Json<UpdateSummary>, ApiError> {
    check_record(&body, R::FIELDS)?;
    let fields = json_to_document(&body)?;

    let summary = collection::<R>(&state, "update")?
        .update_one(single(DATABASE_ID_FIELD, id), fields)
        .await
        .map_err(|e| ApiError::database(R::LABEL, "update", e))?;

    Ok(Json(summary))
}

/// DELETE /{collection}/{id} - remove the document with that `_id`
///
/// Zero deletions is reported in the summary, not as a 404.
pub async fn delete<R: Resource>(
    State(state): State<Arc<AppState>>,
    ValidObjectId(id): ValidObjectId,
) -> Result<Json<DeleteSummary>, ApiError> {
    let summary = collection::<R>(&state, "delete")?
        .delete_one(single(DATABASE_ID_FIELD, id))
        .await
        .map_err(|e| ApiError::database(R::LABEL, "delete", e))?;

    Ok(Json(summary))
}
