//! In-process store backed by ordered maps
//!
//! Mirrors the PostgreSQL schema: ids are assigned per table starting at 1,
//! and reads resolve the same relations the SQL joins do.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{Author, Book, Borrow, Genre, Member, User};

/// One table: rows keyed by id plus the last id handed out
#[derive(Debug)]
pub(super) struct Table<T> {
    pub rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    /// Ids are never reused, even after deletes
    pub fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    pub fn get(&self, id: i32) -> Option<T> {
        self.rows.get(&id).cloned()
    }
}

#[derive(Debug, Default)]
pub(super) struct Tables {
    pub members: Table<Member>,
    pub authors: Table<Author>,
    pub genres: Table<Genre>,
    /// Stored without relations
    pub books: Table<Book>,
    /// Stored without relations
    pub borrows: Table<Borrow>,
    pub users: Table<User>,
}

impl Tables {
    /// Book with author and genre attached
    pub fn resolve_book(&self, book: &Book) -> Book {
        Book {
            author: self.authors.get(book.author_id),
            genre: self.genres.get(book.genre_id),
            ..book.clone()
        }
    }

    /// Borrow with member and book attached
    pub fn resolve_borrow(&self, borrow: &Borrow) -> Borrow {
        Borrow {
            member: self.members.get(borrow.member_id),
            book: self.books.get(borrow.book_id).map(Book::without_relations),
            ..borrow.clone()
        }
    }
}

/// Memory-backed store, used for development and tests
#[derive(Clone, Default)]
pub struct MemoryRepository {
    pub(super) tables: Arc<RwLock<Tables>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}
