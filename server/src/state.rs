//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds one trait object per collection so handlers never know whether
//! they are talking to `PostgreSQL` or the in-memory backend.

use std::sync::Arc;

use sqlx::PgPool;

use crate::services::memory::MemoryStore;
use crate::services::notes::{Note, PgNotes};
use crate::services::store::Collection;
use crate::services::users::{PgUsers, User};

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<dyn Collection<Note>>,
    pub users: Arc<dyn Collection<User>>,
}

impl AppState {
    #[must_use]
    pub fn new(notes: Arc<dyn Collection<Note>>, users: Arc<dyn Collection<User>>) -> Self {
        Self { notes, users }
    }

    /// Collections backed by a migrated `PostgreSQL` pool.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(Arc::new(PgNotes::new(pool.clone())), Arc::new(PgUsers::new(pool)))
    }

    /// Process-local collections; contents are lost on restart.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::<Note>::new()), Arc::new(MemoryStore::<User>::new()))
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
