//! Contact repository.
//!
//! Contacts are append-only: rows are inserted once and never updated or
//! deleted.

use super::DbError;
use crate::validation::NewContact;
use sqlx::SqlitePool;

/// A stored contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Unix seconds at insertion.
    pub created_at: i64,
}

/// Repository for contact operations.
pub struct ContactRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ContactRepository<'a> {
    /// Create a new contact repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a contact and return the stored row.
    pub async fn create(&self, contact: &NewContact) -> Result<Contact, DbError> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO contacts (name, email, phone, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(Contact {
            id: result.last_insert_rowid(),
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            created_at: now,
        })
    }

    /// Load every stored contact in insertion order.
    pub async fn list_all(&self) -> Result<Vec<Contact>, DbError> {
        let rows = sqlx::query_as::<_, (i64, String, String, String, i64)>(
            r#"
            SELECT id, name, email, phone, created_at
            FROM contacts
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, email, phone, created_at)| Contact {
                id,
                name,
                email,
                phone,
                created_at,
            })
            .collect())
    }

    #[cfg(test)]
    pub async fn count(&self) -> Result<i64, DbError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contacts")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
