//! Persistence client: flattens the drawing and submits it to the note store.
//!
//! DESIGN
//! ======
//! Saving is split in two. [`prepare_save`] runs synchronously at the moment
//! the user presses save: it snapshots the canvas pixels into a data URI and
//! captures title and note id. [`save_drawing`] then performs the network
//! round trip. Strokes drawn while a save is in flight do not affect it, and
//! two overlapping saves both proceed (last write wins at the store).
//!
//! ERROR HANDLING
//! ==============
//! Failures are logged and returned to the caller. There is no retry and the
//! on-save callback only fires on success, so the caller's editing state is
//! left untouched when a save fails.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use serde::{Deserialize, Serialize};

use crate::stroke::DrawingSession;

/// File name offered by the "download PNG" action.
pub const DOWNLOAD_FILE_NAME: &str = "note.png";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("canvas snapshot failed: {0}")]
    Snapshot(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("save rejected: {0}")]
    Rejected(String),
}

/// Anything that can flatten the rendered scene to a raster data URI.
pub trait NoteSnapshot {
    /// Encode the current pixels.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Snapshot`] when the surface cannot be encoded.
    fn to_data_url(&self) -> Result<String, PersistError>;
}

/// Body of `POST /notes/save`. `id` is omitted for a new note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveNoteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub image: String,
}

/// A persisted note as returned by the store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SaveNoteResponse {
    success: bool,
    #[serde(default)]
    updated: bool,
    note: Option<Note>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Created(Note),
    Updated(Note),
}

impl SaveOutcome {
    #[must_use]
    pub fn note(&self) -> &Note {
        match self {
            Self::Created(note) | Self::Updated(note) => note,
        }
    }

    /// Operator-facing confirmation text.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Created(_) => "Note saved!",
            Self::Updated(_) => "Note updated!",
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client for the notes collection.
#[derive(Debug, Clone)]
pub struct NotesClient {
    http: reqwest::Client,
    base_url: String,
}

impl NotesClient {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:5000/api`).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.trim_end_matches('/').to_owned() }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `POST /notes/save`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// response that reports `success: false`.
    pub async fn save(&self, request: &SaveNoteRequest) -> Result<SaveOutcome, PersistError> {
        let resp = self.http.post(self.url("/notes/save")).json(request).send().await?;
        let resp = check_status(resp).await?;
        let body: SaveNoteResponse = resp.json().await?;

        if !body.success {
            return Err(PersistError::Rejected(body.error.unwrap_or_else(|| "unknown error".into())));
        }
        let Some(note) = body.note else {
            return Err(PersistError::Rejected("response carried no note".into()));
        };
        Ok(if body.updated { SaveOutcome::Updated(note) } else { SaveOutcome::Created(note) })
    }

    /// `GET /notes`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn list(&self) -> Result<Vec<Note>, PersistError> {
        let resp = self.http.get(self.url("/notes")).send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }

    /// `DELETE /notes/{id}`. Deleting a missing note succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn delete(&self, id: &str) -> Result<(), PersistError> {
        let resp = self.http.delete(self.url(&format!("/notes/{id}"))).send().await?;
        check_status(resp).await?;
        Ok(())
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, PersistError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = match resp.json::<ErrorBody>().await {
        Ok(ErrorBody { error: Some(e) }) => e,
        _ => status.canonical_reason().unwrap_or("request failed").to_owned(),
    };
    Err(PersistError::Status { status: status.as_u16(), message })
}

// =============================================================================
// SAVE FLOW
// =============================================================================

/// Snapshot the scene and capture the session's title and note id.
///
/// # Errors
///
/// Propagates the snapshot failure; no request is built.
pub fn prepare_save(session: &DrawingSession, snapshot: &impl NoteSnapshot) -> Result<SaveNoteRequest, PersistError> {
    let image = snapshot.to_data_url()?;
    Ok(SaveNoteRequest {
        id: session.editing_note_id().map(str::to_owned),
        title: session.title().to_owned(),
        image,
    })
}

/// Target of the "download PNG" action: file name plus data-URI href.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub file_name: &'static str,
    pub href: String,
}

/// Flatten the scene for a local download. Independent of any saved note.
///
/// # Errors
///
/// Propagates the snapshot failure.
pub fn download_link(snapshot: &impl NoteSnapshot) -> Result<DownloadLink, PersistError> {
    Ok(DownloadLink { file_name: DOWNLOAD_FILE_NAME, href: snapshot.to_data_url()? })
}

/// Submit a prepared save and notify `on_save` on success.
///
/// # Errors
///
/// Returns the client error after logging it; `on_save` is not called.
pub async fn save_drawing<F>(client: &NotesClient, request: &SaveNoteRequest, on_save: F) -> Result<SaveOutcome, PersistError>
where
    F: FnOnce(&SaveOutcome),
{
    match client.save(request).await {
        Ok(outcome) => {
            log::info!("{} id={}", outcome.message(), outcome.note().id);
            on_save(&outcome);
            Ok(outcome)
        }
        Err(e) => {
            log::warn!("save failed: {e}");
            Err(e)
        }
    }
}
