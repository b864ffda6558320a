//! Borrows repository
//!
//! Reads join the borrowing member and the borrowed book.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, Row};

use super::{missing_reference, on_insert_violation, MemoryRepository, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        borrow::Borrow,
        member::Member,
    },
};

#[async_trait]
pub trait BorrowsStore: Send + Sync {
    async fn borrows_list(&self) -> AppResult<Vec<Borrow>>;
    async fn borrows_get_by_id(&self, id: i32) -> AppResult<Borrow>;
    /// Insert a new, not yet returned borrow; the member and book must exist
    async fn borrows_create(
        &self,
        member_id: i32,
        book_id: i32,
        borrowed_on: DateTime<Utc>,
    ) -> AppResult<Borrow>;
    /// Set the returned flag; calling it again leaves the flag set
    async fn borrows_mark_returned(&self, id: i32) -> AppResult<Borrow>;
    async fn borrows_delete(&self, id: i32) -> AppResult<()>;
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Borrow {} not found", id))
}

const BORROW_COLUMNS: &str = r#"
    br.borrow_id, br.member_id, br.book_id, br.borrowed_on, br.is_returned,
    m.name AS member_name, m.email AS member_email, m.phone_number AS member_phone_number,
    m.birth_date AS member_birth_date, m.address AS member_address,
    bk.name AS book_name, bk.author_id AS book_author_id, bk.genre_id AS book_genre_id
"#;

const BORROW_JOINS: &str = r#"
    JOIN members m ON m.member_id = br.member_id
    JOIN books bk ON bk.book_id = br.book_id
"#;

fn borrow_from_row(row: &PgRow) -> Result<Borrow, sqlx::Error> {
    let member_id: i32 = row.try_get("member_id")?;
    let book_id: i32 = row.try_get("book_id")?;
    Ok(Borrow {
        borrow_id: row.try_get("borrow_id")?,
        member_id,
        book_id,
        borrowed_on: row.try_get("borrowed_on")?,
        is_returned: row.try_get("is_returned")?,
        member: Some(Member {
            member_id,
            name: row.try_get("member_name")?,
            email: row.try_get("member_email")?,
            phone_number: row.try_get("member_phone_number")?,
            birth_date: row.try_get("member_birth_date")?,
            address: row.try_get("member_address")?,
        }),
        book: Some(Book {
            book_id,
            name: row.try_get("book_name")?,
            author_id: row.try_get("book_author_id")?,
            genre_id: row.try_get("book_genre_id")?,
            author: None,
            genre: None,
        }),
    })
}

#[async_trait]
impl BorrowsStore for Repository {
    async fn borrows_list(&self) -> AppResult<Vec<Borrow>> {
        let query = format!(
            "SELECT {} FROM borrows br {} ORDER BY br.borrow_id",
            BORROW_COLUMNS, BORROW_JOINS
        );
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        let borrows = rows
            .iter()
            .map(borrow_from_row)
            .collect::<Result<Vec<_>, sqlx::Error>>()?;
        Ok(borrows)
    }

    async fn borrows_get_by_id(&self, id: i32) -> AppResult<Borrow> {
        let query = format!(
            "SELECT {} FROM borrows br {} WHERE br.borrow_id = $1",
            BORROW_COLUMNS, BORROW_JOINS
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(borrow_from_row(&row)?)
    }

    async fn borrows_create(
        &self,
        member_id: i32,
        book_id: i32,
        borrowed_on: DateTime<Utc>,
    ) -> AppResult<Borrow> {
        let query = format!(
            r#"
            WITH br AS (
                INSERT INTO borrows (member_id, book_id, borrowed_on, is_returned)
                VALUES ($1, $2, $3, FALSE)
                RETURNING *
            )
            SELECT {} FROM br {}
            "#,
            BORROW_COLUMNS, BORROW_JOINS
        );
        let row = sqlx::query(&query)
            .bind(member_id)
            .bind(book_id)
            .bind(borrowed_on)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                on_insert_violation(
                    e,
                    &[
                        ("borrows_member_fk", "Member", member_id),
                        ("borrows_book_fk", "Book", book_id),
                    ],
                )
            })?;
        Ok(borrow_from_row(&row)?)
    }

    async fn borrows_mark_returned(&self, id: i32) -> AppResult<Borrow> {
        let query = format!(
            r#"
            WITH br AS (
                UPDATE borrows SET is_returned = TRUE
                WHERE borrow_id = $1
                RETURNING *
            )
            SELECT {} FROM br {}
            "#,
            BORROW_COLUMNS, BORROW_JOINS
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(borrow_from_row(&row)?)
    }

    async fn borrows_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM borrows WHERE borrow_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

#[async_trait]
impl BorrowsStore for MemoryRepository {
    async fn borrows_list(&self) -> AppResult<Vec<Borrow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .borrows
            .rows
            .values()
            .map(|borrow| tables.resolve_borrow(borrow))
            .collect())
    }

    async fn borrows_get_by_id(&self, id: i32) -> AppResult<Borrow> {
        let tables = self.tables.read().await;
        tables
            .borrows
            .rows
            .get(&id)
            .map(|borrow| tables.resolve_borrow(borrow))
            .ok_or_else(|| not_found(id))
    }

    async fn borrows_create(
        &self,
        member_id: i32,
        book_id: i32,
        borrowed_on: DateTime<Utc>,
    ) -> AppResult<Borrow> {
        let mut tables = self.tables.write().await;
        if !tables.members.rows.contains_key(&member_id) {
            return Err(missing_reference("Member", member_id));
        }
        if !tables.books.rows.contains_key(&book_id) {
            return Err(missing_reference("Book", book_id));
        }
        let borrow = Borrow {
            borrow_id: tables.borrows.next_id(),
            member_id,
            book_id,
            borrowed_on,
            is_returned: false,
            member: None,
            book: None,
        };
        tables.borrows.rows.insert(borrow.borrow_id, borrow.clone());
        Ok(tables.resolve_borrow(&borrow))
    }

    async fn borrows_mark_returned(&self, id: i32) -> AppResult<Borrow> {
        let mut tables = self.tables.write().await;
        let row = tables.borrows.rows.get_mut(&id).ok_or_else(|| not_found(id))?;
        row.is_returned = true;
        let borrow = row.clone();
        Ok(tables.resolve_borrow(&borrow))
    }

    async fn borrows_delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables.borrows.rows.remove(&id).map(|_| ()).ok_or_else(|| not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        author::CreateAuthor, book::CreateBook, genre::CreateGenre, member::CreateMember,
    };
    use crate::repository::{AuthorsStore, BooksStore, GenresStore, MembersStore};
    use chrono::NaiveDate;

    async fn seeded() -> MemoryRepository {
        let repo = MemoryRepository::new();
        repo.authors_create(&CreateAuthor {
            name: "Orwell".to_string(),
            nationality: "UK".to_string(),
        })
        .await
        .unwrap();
        repo.genres_create(&CreateGenre {
            genre_name: "Dystopian".to_string(),
        })
        .await
        .unwrap();
        repo.books_create(&CreateBook {
            name: "1984".to_string(),
            author_id: 1,
            genre_id: 1,
        })
        .await
        .unwrap();
        repo.members_create(&CreateMember {
            name: "Alice".to_string(),
            email: "alice@example.org".to_string(),
            phone_number: "555-0100".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            address: "1 Main St".to_string(),
        })
        .await
        .unwrap();
        repo
    }

    #[tokio::test]
    async fn new_borrow_is_not_returned() {
        let repo = seeded().await;
        let borrow = repo.borrows_create(1, 1, Utc::now()).await.unwrap();

        assert_eq!(borrow.borrow_id, 1);
        assert!(!borrow.is_returned);
        assert_eq!(borrow.member.as_ref().map(|m| m.name.as_str()), Some("Alice"));
        assert_eq!(borrow.book.as_ref().map(|b| b.name.as_str()), Some("1984"));
    }

    #[tokio::test]
    async fn mark_returned_is_idempotent() {
        let repo = seeded().await;
        let borrow = repo.borrows_create(1, 1, Utc::now()).await.unwrap();

        let returned = repo.borrows_mark_returned(borrow.borrow_id).await.unwrap();
        assert!(returned.is_returned);

        let again = repo.borrows_mark_returned(borrow.borrow_id).await.unwrap();
        assert!(again.is_returned);
        assert_eq!(again.borrowed_on, borrow.borrowed_on);
    }

    #[tokio::test]
    async fn mark_returned_unknown_is_not_found() {
        let repo = seeded().await;
        assert!(matches!(
            repo.borrows_mark_returned(5).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn returned_borrow_can_be_deleted() {
        let repo = seeded().await;
        let borrow = repo.borrows_create(1, 1, Utc::now()).await.unwrap();
        repo.borrows_mark_returned(borrow.borrow_id).await.unwrap();
        assert!(matches!(
            repo.members_delete(1).await,
            Err(AppError::StillReferenced(_))
        ));
        assert!(matches!(
            repo.books_delete(1).await,
            Err(AppError::StillReferenced(_))
        ));

        repo.borrows_delete(borrow.borrow_id).await.unwrap();

        assert!(repo.borrows_list().await.unwrap().is_empty());
        repo.members_delete(1).await.unwrap();
        repo.books_delete(1).await.unwrap();
    }

    #[tokio::test]
    async fn create_rejects_missing_member_or_book() {
        let repo = seeded().await;

        let err = repo.borrows_create(3, 1, Utc::now()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("Member 3")));

        let err = repo.borrows_create(1, 8, Utc::now()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("Book 8")));
        assert!(repo.borrows_list().await.unwrap().is_empty());
    }
}
