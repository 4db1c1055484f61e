//! Users collection.
//!
//! DESIGN
//! ======
//! Users are an independent collection; notes carry no owner. The password
//! is stored as supplied and never serialized back out.
//!
//! ERROR HANDLING
//! ==============
//! Email is unique. A duplicate on insert or replace is reported as
//! [`StoreError::Conflict`] carrying the offending email.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::store::{Collection, Document, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Document for User {
    type Draft = UserDraft;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    fn create(id: Uuid, draft: UserDraft, now: OffsetDateTime) -> Self {
        Self {
            id,
            username: draft.username,
            email: draft.email,
            password: draft.password,
            created_at: now,
            updated_at: None,
        }
    }

    fn replace(&mut self, draft: UserDraft, now: OffsetDateTime) {
        self.username = draft.username;
        self.email = draft.email;
        self.password = draft.password;
        self.updated_at = Some(now);
    }

    fn unique_key(&self) -> Option<&str> {
        Some(self.email.as_str())
    }
}

// =============================================================================
// POSTGRES
// =============================================================================

const COLUMNS: &str = "id, username, email, password, created_at, updated_at";

pub struct PgUsers {
    pool: PgPool,
}

impl PgUsers {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn conflict_or_database(err: sqlx::Error, email: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::Conflict(email.to_owned());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl Collection<User> for PgUsers {
    async fn insert(&self, draft: UserDraft) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, username, email, password) VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&draft.username)
        .bind(&draft.email)
        .bind(&draft.password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, &draft.email))
    }

    async fn update(&self, id: Uuid, draft: UserDraft) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET username = $2, email = $3, password = $4, updated_at = now()
             WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&draft.username)
        .bind(&draft.email)
        .bind(&draft.password)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, &draft.email))?
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC"))
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;
