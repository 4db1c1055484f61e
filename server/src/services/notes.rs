//! Notes collection: flattened drawings with a title.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::store::{Collection, Document, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    /// Raster image, usually a `data:image/png;base64,...` URL.
    pub image: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub image: String,
}

impl Document for Note {
    type Draft = NoteDraft;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    fn create(id: Uuid, draft: NoteDraft, now: OffsetDateTime) -> Self {
        Self { id, title: draft.title, image: draft.image, created_at: now, updated_at: None }
    }

    fn replace(&mut self, draft: NoteDraft, now: OffsetDateTime) {
        self.title = draft.title;
        self.image = draft.image;
        self.updated_at = Some(now);
    }
}

// =============================================================================
// POSTGRES
// =============================================================================

const COLUMNS: &str = "id, title, image, created_at, updated_at";

pub struct PgNotes {
    pool: PgPool,
}

impl PgNotes {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Collection<Note> for PgNotes {
    async fn insert(&self, draft: NoteDraft) -> Result<Note, StoreError> {
        let note = sqlx::query_as::<_, Note>(&format!(
            "INSERT INTO notes (id, title, image) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&draft.title)
        .bind(&draft.image)
        .fetch_one(&self.pool)
        .await?;
        Ok(note)
    }

    async fn update(&self, id: Uuid, draft: NoteDraft) -> Result<Note, StoreError> {
        sqlx::query_as::<_, Note>(&format!(
            "UPDATE notes SET title = $2, image = $3, updated_at = now() WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.image)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list(&self) -> Result<Vec<Note>, StoreError> {
        let notes = sqlx::query_as::<_, Note>(&format!("SELECT {COLUMNS} FROM notes ORDER BY created_at DESC"))
            .fetch_all(&self.pool)
            .await?;
        Ok(notes)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "notes_test.rs"]
mod notes_test;
