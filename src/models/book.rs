//! Book model and related types

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use utoipa::ToSchema;
use validator::Validate;

use super::{author::Author, genre::Genre};

/// Book with its author and genre resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub book_id: i32,
    pub name: String,
    pub author_id: i32,
    pub genre_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<Genre>,
}

/// Create book request. Ids may be sent as numbers or numeric strings.
#[serde_as]
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub author_id: i32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub genre_id: i32,
}

impl Book {
    /// Drop the nested author and genre, keeping the foreign keys
    pub fn without_relations(self) -> Self {
        Self {
            author: None,
            genre: None,
            ..self
        }
    }
}
