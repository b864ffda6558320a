//! Repository layer for database operations
//!
//! Each entity has its own store trait, implemented for the PostgreSQL
//! [`Repository`] and for the in-process [`memory::MemoryRepository`].
//! [`Store`] bundles them for the service layer.

pub mod authors;
pub mod books;
pub mod borrows;
pub mod genres;
pub mod members;
pub mod memory;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::error::{AppError, AppResult};

pub use authors::AuthorsStore;
pub use books::BooksStore;
pub use borrows::BorrowsStore;
pub use genres::GenresStore;
pub use members::MembersStore;
pub use memory::MemoryRepository;
pub use users::UsersStore;

/// Every table the application reads and writes
#[async_trait]
pub trait Store:
    MembersStore + AuthorsStore + GenresStore + BooksStore + BorrowsStore + UsersStore + Send + Sync
{
    /// Check that the backend is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// Shared handle to the configured store
pub type DynStore = Arc<dyn Store>;

/// A row points at a parent that does not exist
pub(crate) fn missing_reference(entity: &str, id: i32) -> AppError {
    AppError::Validation(format!("{} {} does not exist", entity, id))
}

/// Refuse to delete a row that other rows still point at
pub(crate) fn ensure_unreferenced(
    count: usize,
    entity: &str,
    id: i32,
    referrers: &str,
) -> AppResult<()> {
    if count > 0 {
        return Err(AppError::StillReferenced(format!(
            "{} {} is still referenced by {} {}",
            entity, id, count, referrers
        )));
    }
    Ok(())
}

/// Map a foreign key failure raised by an INSERT
///
/// `references` lists `(constraint, entity, id)` for each key the row carries.
pub(crate) fn on_insert_violation(e: sqlx::Error, references: &[(&str, &str, i32)]) -> AppError {
    let constraint = match e.as_database_error() {
        Some(db) if db.is_foreign_key_violation() => db.constraint().map(str::to_owned),
        _ => return AppError::Database(e),
    };
    match references
        .iter()
        .find(|(name, _, _)| constraint.as_deref() == Some(*name))
    {
        Some((_, entity, id)) => missing_reference(entity, *id),
        None => AppError::Validation("Referenced record does not exist".to_string()),
    }
}

/// Map a foreign key failure raised by a DELETE
pub(crate) fn on_delete_violation(e: sqlx::Error, entity: &str, id: i32) -> AppError {
    match e.as_database_error() {
        Some(db) if db.is_foreign_key_violation() => AppError::StillReferenced(format!(
            "{} {} is still referenced by other records",
            entity, id
        )),
        _ => AppError::Database(e),
    }
}

/// PostgreSQL repository holding the connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for Repository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryRepository {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
