//! Data models for Libris

pub mod author;
pub mod book;
pub mod borrow;
pub mod genre;
pub mod member;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book::Book;
pub use borrow::Borrow;
pub use genre::Genre;
pub use member::Member;
pub use user::{User, UserClaims};
