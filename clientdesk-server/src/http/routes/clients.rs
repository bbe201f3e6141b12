//! Client endpoints
//!
//! Full read/write surface: list, create, fetch by application id, merge
//! update and delete by database id.

use std::sync::Arc;

use axum::{routing::get, Router};

use super::resource::{self, Resource};
use crate::http::server::AppState;
use crate::models::{FieldKind, FieldRule};

/// The `client` collection, listed by `name`
pub struct Clients;

impl Resource for Clients {
    const COLLECTION: &'static str = "client";
    const LABEL: &'static str = "client";
    const SORT_KEY: &'static str = "name";
    const FIELDS: &'static [FieldRule] = &[
        FieldRule::new("id", FieldKind::Integer),
        FieldRule::new("name", FieldKind::String),
    ];
}

/// Client routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/client",
            get(resource::list::<Clients>).post(resource::create::<Clients>),
        )
        .route(
            "/client/{id}",
            get(resource::find_by_app_id::<Clients>)
                .put(resource::update::<Clients>)
                .delete(resource::delete::<Clients>),
        )
}
