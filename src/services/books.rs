//! Book catalog service

use validator::Validate;

use crate::{
    error::AppResult,
    models::book::{Book, CreateBook},
    repository::DynStore,
};

#[derive(Clone)]
pub struct BooksService {
    store: DynStore,
}

impl BooksService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.store.books_list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.store.books_get_by_id(id).await
    }

    /// Create a book for an existing author and genre
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        data.validate()?;
        let book = self.store.books_create(data).await?;
        tracing::info!(book_id = book.book_id, "Book created");
        Ok(book)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.store.books_delete(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        error::AppError,
        models::{author::CreateAuthor, genre::CreateGenre},
        repository::MemoryRepository,
        services::{authors::AuthorsService, genres::GenresService},
    };

    fn store() -> DynStore {
        Arc::new(MemoryRepository::new())
    }

    async fn seed(store: &DynStore) {
        AuthorsService::new(store.clone())
            .create(&CreateAuthor {
                name: "Orwell".to_string(),
                nationality: "UK".to_string(),
            })
            .await
            .unwrap();
        GenresService::new(store.clone())
            .create(&CreateGenre {
                genre_name: "Dystopian".to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_rejects_unknown_author() {
        let store = store();
        seed(&store).await;
        let books = BooksService::new(store);

        let err = books
            .create(&CreateBook {
                name: "1984".to_string(),
                author_id: 99,
                genre_id: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("Author 99")));
        assert!(books.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_unknown_genre() {
        let store = store();
        seed(&store).await;
        let books = BooksService::new(store);

        let err = books
            .create(&CreateBook {
                name: "1984".to_string(),
                author_id: 1,
                genre_id: 7,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("Genre 7")));
    }

    #[tokio::test]
    async fn create_rejects_empty_name() {
        let store = store();
        seed(&store).await;
        let books = BooksService::new(store);

        let err = books
            .create(&CreateBook {
                name: String::new(),
                author_id: 1,
                genre_id: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn referenced_author_and_genre_cannot_be_deleted() {
        let store = store();
        seed(&store).await;
        let books = BooksService::new(store.clone());
        let book = books
            .create(&CreateBook {
                name: "1984".to_string(),
                author_id: 1,
                genre_id: 1,
            })
            .await
            .unwrap();

        let authors = AuthorsService::new(store.clone());
        let genres = GenresService::new(store);
        assert!(matches!(authors.delete(1).await, Err(AppError::StillReferenced(_))));
        assert!(matches!(genres.delete(1).await, Err(AppError::StillReferenced(_))));

        books.delete(book.book_id).await.unwrap();
        authors.delete(1).await.unwrap();
        genres.delete(1).await.unwrap();
        assert!(matches!(authors.get_by_id(1).await, Err(AppError::NotFound(_))));
    }
}
