//! Genres repository

use async_trait::async_trait;

use super::{ensure_unreferenced, on_delete_violation, MemoryRepository, Repository};
use crate::{
    error::{AppError, AppResult},
    models::genre::{CreateGenre, Genre},
};

#[async_trait]
pub trait GenresStore: Send + Sync {
    async fn genres_list(&self) -> AppResult<Vec<Genre>>;
    async fn genres_get_by_id(&self, id: i32) -> AppResult<Genre>;
    async fn genres_create(&self, data: &CreateGenre) -> AppResult<Genre>;
    async fn genres_delete(&self, id: i32) -> AppResult<()>;
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Genre {} not found", id))
}

#[async_trait]
impl GenresStore for Repository {
    async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, Genre>("SELECT * FROM genres ORDER BY genre_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn genres_get_by_id(&self, id: i32) -> AppResult<Genre> {
        sqlx::query_as::<_, Genre>("SELECT * FROM genres WHERE genre_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn genres_create(&self, data: &CreateGenre) -> AppResult<Genre> {
        let row = sqlx::query_as::<_, Genre>(
            "INSERT INTO genres (genre_name) VALUES ($1) RETURNING *",
        )
        .bind(&data.genre_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn genres_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM genres WHERE genre_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| on_delete_violation(e, "Genre", id))?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

#[async_trait]
impl GenresStore for MemoryRepository {
    async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        let tables = self.tables.read().await;
        Ok(tables.genres.rows.values().cloned().collect())
    }

    async fn genres_get_by_id(&self, id: i32) -> AppResult<Genre> {
        let tables = self.tables.read().await;
        tables.genres.get(id).ok_or_else(|| not_found(id))
    }

    async fn genres_create(&self, data: &CreateGenre) -> AppResult<Genre> {
        let mut tables = self.tables.write().await;
        let genre = Genre {
            genre_id: tables.genres.next_id(),
            genre_name: data.genre_name.clone(),
        };
        tables.genres.rows.insert(genre.genre_id, genre.clone());
        Ok(genre)
    }

    async fn genres_delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.genres.rows.contains_key(&id) {
            return Err(not_found(id));
        }
        let referrers = tables.books.rows.values().filter(|r| r.genre_id == id).count();
        ensure_unreferenced(referrers, "Genre", id, "book(s)")?;
        tables.genres.rows.remove(&id);
        Ok(())
    }
}
