//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! `store` defines the collection seam and the save/delete rules shared by
//! every collection. `notes` and `users` own their document types and
//! `PostgreSQL` backends; `memory` is the backend used without a database.

pub mod memory;
pub mod notes;
pub mod store;
pub mod users;
