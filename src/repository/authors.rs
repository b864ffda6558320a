//! Authors repository

use async_trait::async_trait;

use super::{ensure_unreferenced, on_delete_violation, MemoryRepository, Repository};
use crate::{
    error::{AppError, AppResult},
    models::author::{Author, CreateAuthor},
};

#[async_trait]
pub trait AuthorsStore: Send + Sync {
    async fn authors_list(&self) -> AppResult<Vec<Author>>;
    async fn authors_get_by_id(&self, id: i32) -> AppResult<Author>;
    async fn authors_create(&self, data: &CreateAuthor) -> AppResult<Author>;
    async fn authors_delete(&self, id: i32) -> AppResult<()>;
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Author {} not found", id))
}

#[async_trait]
impl AuthorsStore for Repository {
    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>("SELECT * FROM authors ORDER BY author_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn authors_get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE author_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn authors_create(&self, data: &CreateAuthor) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            "INSERT INTO authors (name, nationality) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.nationality)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn authors_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE author_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| on_delete_violation(e, "Author", id))?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthorsStore for MemoryRepository {
    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        let tables = self.tables.read().await;
        Ok(tables.authors.rows.values().cloned().collect())
    }

    async fn authors_get_by_id(&self, id: i32) -> AppResult<Author> {
        let tables = self.tables.read().await;
        tables.authors.get(id).ok_or_else(|| not_found(id))
    }

    async fn authors_create(&self, data: &CreateAuthor) -> AppResult<Author> {
        let mut tables = self.tables.write().await;
        let author = Author {
            author_id: tables.authors.next_id(),
            name: data.name.clone(),
            nationality: data.nationality.clone(),
        };
        tables.authors.rows.insert(author.author_id, author.clone());
        Ok(author)
    }

    async fn authors_delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.authors.rows.contains_key(&id) {
            return Err(not_found(id));
        }
        let referrers = tables.books.rows.values().filter(|r| r.author_id == id).count();
        ensure_unreferenced(referrers, "Author", id, "book(s)")?;
        tables.authors.rows.remove(&id);
        Ok(())
    }
}
