//! Custom Axum extractors

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use bson::oid::ObjectId;
use serde_json::{Map, Value};

use super::error::ApiError;
use crate::models::{parse_app_id, parse_object_id, ValidationError};

/// Extract a database identifier from path, rejecting malformed ids with 400
pub struct ValidObjectId(pub ObjectId);

impl<S> FromRequestParts<S> for ValidObjectId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::InvalidFormat {
                field: "id",
                reason: "missing path identifier",
            }))?;

        Ok(Self(parse_object_id(&id)?))
    }
}

/// Extract an application id from path.
///
/// Never rejects: an unparseable id is `None` and matches no document.
pub struct AppIdPath(pub Option<i64>);

impl<S> FromRequestParts<S> for AppIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let id = Path::<String>::from_request_parts(parts, state)
            .await
            .ok()
            .and_then(|Path(raw)| parse_app_id(&raw));
        Ok(Self(id))
    }
}

/// JSON body that must be an object
///
/// A missing `Content-Type: application/json` is a 415; anything else that
/// fails to parse is a 400.
pub struct JsonObject(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection {
                JsonRejection::MissingJsonContentType(_) => ApiError::UnsupportedMediaType,
                other => ValidationError::MalformedJson {
                    reason: other.body_text(),
                }
                .into(),
            })?;

        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ValidationError::NotAnObject.into()),
        }
    }
}
