//! Borrow (loan) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use utoipa::ToSchema;

use super::{book::Book, member::Member};

/// Borrow record linking a member to a book
///
/// `is_returned` starts out false and only ever moves to true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Borrow {
    pub borrow_id: i32,
    pub member_id: i32,
    pub book_id: i32,
    pub borrowed_on: DateTime<Utc>,
    pub is_returned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<Book>,
}

/// Create borrow request. Ids may be sent as numbers or numeric strings.
#[serde_as]
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBorrow {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub member_id: i32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub book_id: i32,
    /// Defaults to the current time
    pub borrowed_on: Option<DateTime<Utc>>,
}
