//! In-memory collection backend.
//!
//! DESIGN
//! ======
//! Documents live in insertion order behind a tokio `RwLock`. Each operation
//! takes the lock once, so every operation is atomic with respect to the
//! others. Used when no `DATABASE_URL` is configured and by route tests.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{Collection, Document, StoreError};

pub struct MemoryStore<D> {
    docs: RwLock<Vec<D>>,
}

impl<D: Document> MemoryStore<D> {
    #[must_use]
    pub fn new() -> Self {
        Self { docs: RwLock::new(Vec::new()) }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

impl<D: Document> Default for MemoryStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject `candidate` if another document (other than `skip`) holds its key.
fn check_unique<D: Document>(docs: &[D], candidate: &D, skip: Option<Uuid>) -> Result<(), StoreError> {
    let Some(key) = candidate.unique_key() else {
        return Ok(());
    };
    let taken = docs
        .iter()
        .filter(|doc| Some(doc.id()) != skip)
        .any(|doc| doc.unique_key() == Some(key));
    if taken { Err(StoreError::Conflict(key.to_owned())) } else { Ok(()) }
}

#[async_trait]
impl<D: Document> Collection<D> for MemoryStore<D> {
    async fn insert(&self, draft: D::Draft) -> Result<D, StoreError> {
        let doc = D::create(Uuid::new_v4(), draft, OffsetDateTime::now_utc());
        let mut docs = self.docs.write().await;
        check_unique(&docs, &doc, None)?;
        docs.push(doc.clone());
        Ok(doc)
    }

    async fn update(&self, id: Uuid, draft: D::Draft) -> Result<D, StoreError> {
        let mut docs = self.docs.write().await;
        let Some(index) = docs.iter().position(|doc| doc.id() == id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        let mut next = docs[index].clone();
        next.replace(draft, OffsetDateTime::now_utc());
        check_unique(&docs, &next, Some(id))?;
        docs[index] = next.clone();
        Ok(next)
    }

    async fn list(&self) -> Result<Vec<D>, StoreError> {
        let mut out: Vec<D> = self.docs.read().await.iter().rev().cloned().collect();
        // Stable sort over reversed insertion order: equal timestamps stay newest first.
        out.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(out)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.docs.write().await.retain(|doc| doc.id() != id);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;
