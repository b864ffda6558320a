//! Genre management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::genre::{CreateGenre, Genre},
    repository::DynStore,
};

#[derive(Clone)]
pub struct GenresService {
    store: DynStore,
}

impl GenresService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.store.genres_list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Genre> {
        self.store.genres_get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateGenre) -> AppResult<Genre> {
        data.validate()?;
        let genre = self.store.genres_create(data).await?;
        tracing::info!(genre_id = genre.genre_id, "Genre created");
        Ok(genre)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.store.genres_delete(id).await?;
        tracing::info!(genre_id = id, "Genre deleted");
        Ok(())
    }
}
