//! Member management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::member::{CreateMember, Member, UpdateMember},
    AppState,
};

/// List all members
#[utoipa::path(
    get,
    path = "/Members",
    tag = "members",
    responses(
        (status = 200, description = "All members", body = Vec<Member>)
    )
)]
pub async fn list_members(State(state): State<AppState>) -> AppResult<Json<Vec<Member>>> {
    let members = state.services.members.list().await?;
    Ok(Json(members))
}

/// Get member by ID
#[utoipa::path(
    get,
    path = "/Members/{id}",
    tag = "members",
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member details", body = Member),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Member>> {
    let member = state.services.members.get_by_id(id).await?;
    Ok(Json(member))
}

/// Register a member
#[utoipa::path(
    post,
    path = "/Members",
    tag = "members",
    request_body = CreateMember,
    responses(
        (status = 200, description = "Member created", body = Member),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_member(
    State(state): State<AppState>,
    Json(data): Json<CreateMember>,
) -> AppResult<Json<Member>> {
    let member = state.services.members.create(&data).await?;
    Ok(Json(member))
}

/// Replace a member's details
#[utoipa::path(
    put,
    path = "/Members/{id}",
    tag = "members",
    params(("id" = i32, Path, description = "Member ID")),
    request_body = CreateMember,
    responses(
        (status = 200, description = "Member updated", body = Member),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(data): Json<UpdateMember>,
) -> AppResult<Json<Member>> {
    let member = state.services.members.update(id, &data).await?;
    Ok(Json(member))
}

/// Delete a member
#[utoipa::path(
    delete,
    path = "/Members/{id}",
    tag = "members",
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member deleted"),
        (status = 404, description = "Member not found"),
        (status = 409, description = "Member has borrows")
    )
)]
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.members.delete(id).await?;
    Ok(StatusCode::OK)
}
