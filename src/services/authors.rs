//! Author management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::author::{Author, CreateAuthor},
    repository::DynStore,
};

#[derive(Clone)]
pub struct AuthorsService {
    store: DynStore,
}

impl AuthorsService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.store.authors_list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        self.store.authors_get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateAuthor) -> AppResult<Author> {
        data.validate()?;
        let author = self.store.authors_create(data).await?;
        tracing::info!(author_id = author.author_id, "Author created");
        Ok(author)
    }

    /// Delete an author no book refers to
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.store.authors_delete(id).await?;
        tracing::info!(author_id = id, "Author deleted");
        Ok(())
    }
}
