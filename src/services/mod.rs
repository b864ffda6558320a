//! Business logic services

pub mod authors;
pub mod books;
pub mod borrows;
pub mod genres;
pub mod members;
pub mod users;

use crate::{
    config::AuthConfig,
    error::AppResult,
    repository::DynStore,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub members: members::MembersService,
    pub authors: authors::AuthorsService,
    pub genres: genres::GenresService,
    pub books: books::BooksService,
    pub borrows: borrows::BorrowsService,
    pub users: users::UsersService,
    store: DynStore,
}

impl Services {
    /// Create all services on top of the given store
    pub fn new(store: DynStore, auth_config: AuthConfig) -> Self {
        Self {
            members: members::MembersService::new(store.clone()),
            authors: authors::AuthorsService::new(store.clone()),
            genres: genres::GenresService::new(store.clone()),
            books: books::BooksService::new(store.clone()),
            borrows: borrows::BorrowsService::new(store.clone()),
            users: users::UsersService::new(store.clone(), auth_config),
            store,
        }
    }

    /// Check that the store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}
