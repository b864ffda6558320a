//! Account endpoints: signup, login and current user

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::user::{Credentials, LoginResponse, User},
    AppState,
};

use super::AuthenticatedUser;

/// Create an account
#[utoipa::path(
    post,
    path = "/Users/signup",
    tag = "users",
    request_body = Credentials,
    responses(
        (status = 200, description = "Account created", body = User),
        (status = 400, description = "Invalid email or empty password"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> AppResult<Json<User>> {
    let user = state.services.users.signup(&credentials).await?;
    Ok(Json(user))
}

/// Log in and receive a bearer token
#[utoipa::path(
    post,
    path = "/Users/login",
    tag = "users",
    request_body = Credentials,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 404, description = "Unknown email or wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> AppResult<Json<LoginResponse>> {
    let response = state.services.users.login(&credentials).await?;
    Ok(Json(response))
}

/// Get the account behind the bearer token
#[utoipa::path(
    get,
    path = "/Users/me",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_by_id(claims.user_id).await?;
    Ok(Json(user))
}
