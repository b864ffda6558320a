//! Borrow (loan) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::borrow::{Borrow, CreateBorrow},
    AppState,
};

/// List all borrows with member and book
#[utoipa::path(
    get,
    path = "/Borrows",
    tag = "borrows",
    responses(
        (status = 200, description = "All borrows", body = Vec<Borrow>)
    )
)]
pub async fn list_borrows(State(state): State<AppState>) -> AppResult<Json<Vec<Borrow>>> {
    let borrows = state.services.borrows.list().await?;
    Ok(Json(borrows))
}

/// Get borrow by ID
#[utoipa::path(
    get,
    path = "/Borrows/{id}",
    tag = "borrows",
    params(("id" = i32, Path, description = "Borrow ID")),
    responses(
        (status = 200, description = "Borrow details", body = Borrow),
        (status = 404, description = "Borrow not found")
    )
)]
pub async fn get_borrow(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Borrow>> {
    let borrow = state.services.borrows.get_by_id(id).await?;
    Ok(Json(borrow))
}

/// Lend a book to a member
#[utoipa::path(
    post,
    path = "/Borrows",
    tag = "borrows",
    request_body = CreateBorrow,
    responses(
        (status = 200, description = "Borrow created", body = Borrow),
        (status = 400, description = "Unknown member or book")
    )
)]
pub async fn create_borrow(
    State(state): State<AppState>,
    Json(data): Json<CreateBorrow>,
) -> AppResult<Json<Borrow>> {
    let borrow = state.services.borrows.create(&data).await?;
    Ok(Json(borrow))
}

/// Mark a borrow as returned. Any request body is ignored.
#[utoipa::path(
    put,
    path = "/Borrows/{id}",
    tag = "borrows",
    params(("id" = i32, Path, description = "Borrow ID")),
    responses(
        (status = 200, description = "Book returned", body = Borrow),
        (status = 404, description = "Borrow not found")
    )
)]
pub async fn return_borrow(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Borrow>> {
    let borrow = state.services.borrows.return_borrow(id).await?;
    Ok(Json(borrow))
}

/// Delete a borrow, returned or not
#[utoipa::path(
    delete,
    path = "/Borrows/{id}",
    tag = "borrows",
    params(("id" = i32, Path, description = "Borrow ID")),
    responses(
        (status = 200, description = "Borrow deleted"),
        (status = 404, description = "Borrow not found")
    )
)]
pub async fn delete_borrow(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.borrows.delete(id).await?;
    Ok(StatusCode::OK)
}
