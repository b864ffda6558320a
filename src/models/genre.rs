//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Genre record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    pub genre_id: i32,
    pub genre_name: String,
}

/// Create genre request (accepts `genreName` or `name`)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGenre {
    #[serde(alias = "name")]
    #[validate(length(min = 1, message = "Genre name must not be empty"))]
    pub genre_name: String,
}
