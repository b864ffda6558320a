//! Libris Library Lending Server
//!
//! A REST JSON API for managing library members, authors, genres, books and
//! the borrows that lend books to members.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the state on top of an already opened store
    pub fn new(config: AppConfig, store: repository::DynStore) -> Self {
        let services = services::Services::new(store, config.auth.clone());
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
