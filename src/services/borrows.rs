//! Borrow (loan) service

use chrono::Utc;

use crate::{
    error::AppResult,
    models::borrow::{Borrow, CreateBorrow},
    repository::DynStore,
};

#[derive(Clone)]
pub struct BorrowsService {
    store: DynStore,
}

impl BorrowsService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Borrow>> {
        self.store.borrows_list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Borrow> {
        self.store.borrows_get_by_id(id).await
    }

    /// Lend a book to a member. No availability or quota checks are made.
    pub async fn create(&self, data: &CreateBorrow) -> AppResult<Borrow> {
        let borrowed_on = data.borrowed_on.unwrap_or_else(Utc::now);
        let borrow = self
            .store
            .borrows_create(data.member_id, data.book_id, borrowed_on)
            .await?;
        tracing::info!(
            borrow_id = borrow.borrow_id,
            member_id = borrow.member_id,
            book_id = borrow.book_id,
            "Book borrowed"
        );
        Ok(borrow)
    }

    /// Mark a borrow as returned
    pub async fn return_borrow(&self, id: i32) -> AppResult<Borrow> {
        let borrow = self.store.borrows_mark_returned(id).await?;
        tracing::info!(borrow_id = id, "Book returned");
        Ok(borrow)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.store.borrows_delete(id).await?;
        tracing::info!(borrow_id = id, "Borrow deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::{
        error::AppError,
        models::{
            author::CreateAuthor, book::CreateBook, genre::CreateGenre, member::CreateMember,
        },
        repository::MemoryRepository,
        services::Services,
        config::AuthConfig,
    };

    async fn seeded() -> Services {
        let services = Services::new(Arc::new(MemoryRepository::new()), AuthConfig::default());
        services
            .authors
            .create(&CreateAuthor {
                name: "Orwell".to_string(),
                nationality: "UK".to_string(),
            })
            .await
            .unwrap();
        services
            .genres
            .create(&CreateGenre {
                genre_name: "Dystopian".to_string(),
            })
            .await
            .unwrap();
        services
            .books
            .create(&CreateBook {
                name: "1984".to_string(),
                author_id: 1,
                genre_id: 1,
            })
            .await
            .unwrap();
        services
            .members
            .create(&CreateMember {
                name: "Alice".to_string(),
                email: "alice@example.org".to_string(),
                phone_number: "555-0100".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                address: "1 Main St".to_string(),
            })
            .await
            .unwrap();
        services
    }

    fn borrow_request() -> CreateBorrow {
        CreateBorrow {
            member_id: 1,
            book_id: 1,
            borrowed_on: None,
        }
    }

    #[tokio::test]
    async fn borrow_starts_active_and_returns_once() {
        let services = seeded().await;
        let borrow = services.borrows.create(&borrow_request()).await.unwrap();
        assert!(!borrow.is_returned);

        let returned = services.borrows.return_borrow(borrow.borrow_id).await.unwrap();
        assert!(returned.is_returned);
        let again = services.borrows.return_borrow(borrow.borrow_id).await.unwrap();
        assert!(again.is_returned);
    }

    #[tokio::test]
    async fn explicit_borrow_date_is_kept() {
        let services = seeded().await;
        let when = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap();
        let borrow = services
            .borrows
            .create(&CreateBorrow {
                borrowed_on: Some(when),
                ..borrow_request()
            })
            .await
            .unwrap();
        assert_eq!(borrow.borrowed_on, when);
    }

    #[tokio::test]
    async fn create_rejects_dangling_references() {
        let services = seeded().await;
        let err = services
            .borrows
            .create(&CreateBorrow {
                member_id: 3,
                ..borrow_request()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("Member 3")));

        let err = services
            .borrows
            .create(&CreateBorrow {
                book_id: 8,
                ..borrow_request()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("Book 8")));
    }

    #[tokio::test]
    async fn borrowed_member_and_book_are_protected() {
        let services = seeded().await;
        let borrow = services.borrows.create(&borrow_request()).await.unwrap();

        assert!(matches!(
            services.members.delete(1).await,
            Err(AppError::StillReferenced(_))
        ));
        assert!(matches!(
            services.books.delete(1).await,
            Err(AppError::StillReferenced(_))
        ));

        services.borrows.delete(borrow.borrow_id).await.unwrap();
        services.members.delete(1).await.unwrap();
        services.books.delete(1).await.unwrap();
        assert!(matches!(
            services.borrows.get_by_id(borrow.borrow_id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
