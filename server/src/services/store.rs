//! Collection store: the persistence seam behind the notes and users routes.
//!
//! DESIGN
//! ======
//! Every collection is a flat list of documents keyed by a store-assigned
//! UUID. A save with no id inserts; a save with an id replaces the whole
//! document (no field merge). Listing is newest first by `created_at`.
//! Delete is idempotent. Backends implement [`Collection`]; route handlers
//! only ever see `Arc<dyn Collection<D>>`.
//!
//! ERROR HANDLING
//! ==============
//! Replacing a document that does not exist, or whose id is not a UUID, is
//! [`StoreError::NotFound`] rather than a silent success. Uniqueness
//! violations surface as [`StoreError::Conflict`]; everything else is a
//! database fault.

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A stored record with a store-assigned identity and creation time.
pub trait Document: Clone + Send + Sync + 'static {
    /// Caller-supplied fields for create and replace.
    type Draft: Send + 'static;

    fn id(&self) -> Uuid;
    fn created_at(&self) -> OffsetDateTime;

    /// Build a fresh document from a draft.
    fn create(id: Uuid, draft: Self::Draft, now: OffsetDateTime) -> Self;

    /// Full replace of the caller-owned fields; identity and `created_at` stay.
    fn replace(&mut self, draft: Self::Draft, now: OffsetDateTime);

    /// Value that must be unique across the collection, if any.
    fn unique_key(&self) -> Option<&str> {
        None
    }
}

/// Outcome of [`save`], distinguishing insert from replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Saved<D> {
    Created(D),
    Updated(D),
}

impl<D> Saved<D> {
    #[must_use]
    pub fn document(&self) -> &D {
        match self {
            Self::Created(d) | Self::Updated(d) => d,
        }
    }

    #[cfg(test)]
    pub fn into_document(self) -> D {
        match self {
            Self::Created(d) | Self::Updated(d) => d,
        }
    }
}

#[async_trait]
pub trait Collection<D: Document>: Send + Sync {
    /// Insert a new document with a fresh id.
    async fn insert(&self, draft: D::Draft) -> Result<D, StoreError>;

    /// Replace the document with `id`.
    async fn update(&self, id: Uuid, draft: D::Draft) -> Result<D, StoreError>;

    /// All documents, newest first.
    async fn list(&self) -> Result<Vec<D>, StoreError>;

    /// Remove `id` if present. Missing ids are not an error.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Create when `id` is absent or blank, otherwise replace.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] when `id` is malformed or unknown, and
/// propagates backend failures.
pub async fn save<D: Document>(
    store: &dyn Collection<D>,
    id: Option<&str>,
    draft: D::Draft,
) -> Result<Saved<D>, StoreError> {
    match id.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => store.insert(draft).await.map(Saved::Created),
        Some(raw) => {
            let id = Uuid::parse_str(raw).map_err(|_| StoreError::NotFound(raw.to_owned()))?;
            store.update(id, draft).await.map(Saved::Updated)
        }
    }
}

/// Delete by a raw path id. Malformed ids cannot name a document, so they
/// are a successful no-op like any other missing id.
///
/// # Errors
///
/// Propagates backend failures.
pub async fn delete<D: Document>(store: &dyn Collection<D>, raw: &str) -> Result<(), StoreError> {
    match Uuid::parse_str(raw.trim()) {
        Ok(id) => store.delete(id).await,
        Err(_) => {
            tracing::debug!(id = %raw, "delete with malformed id; nothing to remove");
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
