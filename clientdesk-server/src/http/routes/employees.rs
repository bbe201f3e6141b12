//! Employee endpoints (read-only)

use std::sync::Arc;

use axum::{routing::get, Router};

use super::resource::{self, Resource};
use crate::http::server::AppState;
use crate::models::{FieldKind, FieldRule};

/// The `employees` collection, listed by `salary`
pub struct Employees;

impl Resource for Employees {
    const COLLECTION: &'static str = "employees";
    const LABEL: &'static str = "employee";
    const SORT_KEY: &'static str = "salary";
    const FIELDS: &'static [FieldRule] = &[
        FieldRule::new("id", FieldKind::Integer),
        FieldRule::new("salary", FieldKind::Number),
    ];
}

/// Employee routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/employees", get(resource::list::<Employees>))
        .route("/employees/{id}", get(resource::find_by_app_id::<Employees>))
}
