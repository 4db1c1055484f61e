//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the notes and users CRUD endpoints plus a health probe under a
//! single Axum router. The collection routes are mounted at the root and
//! again under `/api`, the prefix browser clients use.
//!
//! ERROR HANDLING
//! ==============
//! Every failure leaves as `{success: false, error}`. Store faults are logged
//! with full detail and answered with a generic message, as are bodies
//! missing required fields. Only not-found, malformed JSON and oversize
//! bodies keep their own status.

pub mod notes;
pub mod users;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post};
use serde::Serialize;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::services::store::StoreError;
use crate::state::AppState;

// =============================================================================
// ROUTER
// =============================================================================

/// Full application router. `body_limit` caps request bodies in bytes.
pub fn app(state: AppState, body_limit: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(collection_routes())
        .nest("/api", collection_routes())
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/notes", get(notes::list_notes))
        .route("/notes/save", post(notes::save_note))
        .route("/notes/{id}", delete(notes::delete_note))
        .route("/users", get(users::list_users))
        .route("/users/save", post(users::save_user))
        .route("/users/{id}", delete(users::delete_user))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// RESPONSES
// =============================================================================

/// `{success: true, deleted: true}`, returned whether or not the id existed.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted: bool,
}

impl DeleteResponse {
    pub(crate) const DONE: Self = Self { success: true, deleted: true };
}

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_false(flag: &bool) -> bool {
    !*flag
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Map a store failure. `generic` is the only text clients see for
    /// internal faults.
    pub(crate) fn store(err: StoreError, generic: &str) -> Self {
        match &err {
            StoreError::NotFound(id) => {
                tracing::info!(%id, "document not found");
                Self { status: StatusCode::NOT_FOUND, message: format!("not found: {id}") }
            }
            StoreError::Conflict(_) | StoreError::Database(_) => {
                tracing::error!(error = %err, "store operation failed");
                Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: generic.to_owned() }
            }
        }
    }

    /// Well-formed JSON missing required fields is a store-level failure and
    /// answers like one; syntax and size errors keep axum's status.
    pub(crate) fn rejected(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "request body rejected");
        match rejection {
            JsonRejection::JsonDataError(_) => {
                Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: "Internal Server Error".to_owned() }
            }
            other => Self { status: other.status(), message: other.body_text() },
        }
    }

    #[cfg(test)]
    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { success: false, error: &self.message })).into_response()
    }
}
