//! Books repository
//!
//! Reads always join the book's author and genre.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, Row};

use super::{
    ensure_unreferenced, missing_reference, on_delete_violation, on_insert_violation,
    MemoryRepository, Repository,
};
use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{Book, CreateBook},
        genre::Genre,
    },
};

#[async_trait]
pub trait BooksStore: Send + Sync {
    async fn books_list(&self) -> AppResult<Vec<Book>>;
    async fn books_get_by_id(&self, id: i32) -> AppResult<Book>;
    /// Insert a book; the author and genre must exist
    async fn books_create(&self, data: &CreateBook) -> AppResult<Book>;
    /// Delete a book no borrow refers to
    async fn books_delete(&self, id: i32) -> AppResult<()>;
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Book {} not found", id))
}

const BOOK_COLUMNS: &str = r#"
    b.book_id, b.name, b.author_id, b.genre_id,
    a.name AS author_name, a.nationality AS author_nationality,
    g.genre_name
"#;

const BOOK_JOINS: &str = r#"
    JOIN authors a ON a.author_id = b.author_id
    JOIN genres g ON g.genre_id = b.genre_id
"#;

fn book_from_row(row: &PgRow) -> Result<Book, sqlx::Error> {
    let author_id: i32 = row.try_get("author_id")?;
    let genre_id: i32 = row.try_get("genre_id")?;
    Ok(Book {
        book_id: row.try_get("book_id")?,
        name: row.try_get("name")?,
        author_id,
        genre_id,
        author: Some(Author {
            author_id,
            name: row.try_get("author_name")?,
            nationality: row.try_get("author_nationality")?,
        }),
        genre: Some(Genre {
            genre_id,
            genre_name: row.try_get("genre_name")?,
        }),
    })
}

#[async_trait]
impl BooksStore for Repository {
    /// List all books with author and genre
    async fn books_list(&self) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books b {} ORDER BY b.book_id",
            BOOK_COLUMNS, BOOK_JOINS
        );
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        let books = rows
            .iter()
            .map(book_from_row)
            .collect::<Result<Vec<_>, sqlx::Error>>()?;
        Ok(books)
    }

    /// Get book by ID
    async fn books_get_by_id(&self, id: i32) -> AppResult<Book> {
        let query = format!(
            "SELECT {} FROM books b {} WHERE b.book_id = $1",
            BOOK_COLUMNS, BOOK_JOINS
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(book_from_row(&row)?)
    }

    /// Create book; the insert and the join run as one statement
    async fn books_create(&self, data: &CreateBook) -> AppResult<Book> {
        let query = format!(
            r#"
            WITH b AS (
                INSERT INTO books (name, author_id, genre_id)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT {} FROM b {}
            "#,
            BOOK_COLUMNS, BOOK_JOINS
        );
        let row = sqlx::query(&query)
            .bind(&data.name)
            .bind(data.author_id)
            .bind(data.genre_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                on_insert_violation(
                    e,
                    &[
                        ("books_author_fk", "Author", data.author_id),
                        ("books_genre_fk", "Genre", data.genre_id),
                    ],
                )
            })?;
        Ok(book_from_row(&row)?)
    }

    async fn books_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE book_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| on_delete_violation(e, "Book", id))?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

#[async_trait]
impl BooksStore for MemoryRepository {
    async fn books_list(&self) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .rows
            .values()
            .map(|book| tables.resolve_book(book))
            .collect())
    }

    async fn books_get_by_id(&self, id: i32) -> AppResult<Book> {
        let tables = self.tables.read().await;
        tables
            .books
            .rows
            .get(&id)
            .map(|book| tables.resolve_book(book))
            .ok_or_else(|| not_found(id))
    }

    async fn books_create(&self, data: &CreateBook) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        if !tables.authors.rows.contains_key(&data.author_id) {
            return Err(missing_reference("Author", data.author_id));
        }
        if !tables.genres.rows.contains_key(&data.genre_id) {
            return Err(missing_reference("Genre", data.genre_id));
        }
        let book = Book {
            book_id: tables.books.next_id(),
            name: data.name.clone(),
            author_id: data.author_id,
            genre_id: data.genre_id,
            author: None,
            genre: None,
        };
        tables.books.rows.insert(book.book_id, book.clone());
        Ok(tables.resolve_book(&book))
    }

    async fn books_delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.books.rows.contains_key(&id) {
            return Err(not_found(id));
        }
        let borrows = tables.borrows.rows.values().filter(|b| b.book_id == id).count();
        ensure_unreferenced(borrows, "Book", id, "borrow(s)")?;
        tables.books.rows.remove(&id);
        Ok(())
    }
}
