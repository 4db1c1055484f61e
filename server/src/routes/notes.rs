//! Notes endpoints: save (create or replace), list, delete.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use super::{ApiError, DeleteResponse, is_false};
use crate::services::notes::{Note, NoteDraft};
use crate::services::store::{self, Saved};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveNoteBody {
    /// Present when replacing an existing note.
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct SaveNoteResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub created: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub updated: bool,
    pub note: Note,
}

impl From<Saved<Note>> for SaveNoteResponse {
    fn from(saved: Saved<Note>) -> Self {
        match saved {
            Saved::Created(note) => Self { success: true, created: true, updated: false, note },
            Saved::Updated(note) => Self { success: true, created: false, updated: true, note },
        }
    }
}

/// `POST /notes/save` — create without an id, full replace with one.
pub async fn save_note(
    State(state): State<AppState>,
    body: Result<Json<SaveNoteBody>, JsonRejection>,
) -> Result<Json<SaveNoteResponse>, ApiError> {
    let Json(body) = body.map_err(ApiError::rejected)?;
    let draft = NoteDraft { title: body.title, image: body.image };

    let saved = store::save(state.notes.as_ref(), body.id.as_deref(), draft)
        .await
        .map_err(|e| ApiError::store(e, "Internal Server Error"))?;

    tracing::info!(
        note_id = %saved.document().id,
        created = matches!(saved, Saved::Created(_)),
        "note saved"
    );
    Ok(Json(saved.into()))
}

/// `GET /notes` — every note, newest first.
pub async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state
        .notes
        .list()
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch notes"))?;
    Ok(Json(notes))
}

/// `DELETE /notes/:id` — idempotent.
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    store::delete(state.notes.as_ref(), &id)
        .await
        .map_err(|e| ApiError::store(e, "Delete failed"))?;
    tracing::info!(note_id = %id, "note deleted");
    Ok(Json(DeleteResponse::DONE))
}

#[cfg(test)]
#[path = "notes_test.rs"]
mod notes_test;
