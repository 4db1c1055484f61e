//! Users endpoints: save (create or replace), list, delete.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use super::{ApiError, DeleteResponse, is_false};
use crate::services::store::{self, Saved};
use crate::services::users::{User, UserDraft};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveUserBody {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SaveUserResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub created: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub updated: bool,
    pub user: User,
}

impl From<Saved<User>> for SaveUserResponse {
    fn from(saved: Saved<User>) -> Self {
        match saved {
            Saved::Created(user) => Self { success: true, created: true, updated: false, user },
            Saved::Updated(user) => Self { success: true, created: false, updated: true, user },
        }
    }
}

/// `POST /users/save`
pub async fn save_user(
    State(state): State<AppState>,
    body: Result<Json<SaveUserBody>, JsonRejection>,
) -> Result<Json<SaveUserResponse>, ApiError> {
    let Json(body) = body.map_err(ApiError::rejected)?;
    let draft = UserDraft { username: body.username, email: body.email, password: body.password };

    let saved = store::save(state.users.as_ref(), body.id.as_deref(), draft)
        .await
        .map_err(|e| ApiError::store(e, "Internal Server Error"))?;

    tracing::info!(
        user_id = %saved.document().id,
        created = matches!(saved, Saved::Created(_)),
        "user saved"
    );
    Ok(Json(saved.into()))
}

/// `GET /users`
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state
        .users
        .list()
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch Users!"))?;
    Ok(Json(users))
}

/// `DELETE /users/:id`
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    store::delete(state.users.as_ref(), &id)
        .await
        .map_err(|e| ApiError::store(e, "Delete failed"))?;
    tracing::info!(user_id = %id, "user deleted");
    Ok(Json(DeleteResponse::DONE))
}

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;
