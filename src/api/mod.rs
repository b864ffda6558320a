//! API handlers for Libris REST endpoints

pub mod authors;
pub mod books;
pub mod borrows;
pub mod genres;
pub mod health;
pub mod members;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = state.services.users.validate_token(token)?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Members
        .route("/Members", get(members::list_members).post(members::create_member))
        .route(
            "/Members/:id",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        // Authors
        .route("/Authors", get(authors::list_authors).post(authors::create_author))
        .route(
            "/Authors/:id",
            get(authors::get_author).delete(authors::delete_author),
        )
        // Genres
        .route("/Genres", get(genres::list_genres).post(genres::create_genre))
        .route(
            "/Genres/:id",
            get(genres::get_genre).delete(genres::delete_genre),
        )
        // Books
        .route("/Books", get(books::list_books).post(books::create_book))
        .route(
            "/Books/:id",
            get(books::get_book).delete(books::delete_book),
        )
        // Borrows
        .route("/Borrows", get(borrows::list_borrows).post(borrows::create_borrow))
        .route(
            "/Borrows/:id",
            get(borrows::get_borrow)
                .put(borrows::return_borrow)
                .delete(borrows::delete_borrow),
        )
        // Users
        .route("/Users/signup", post(users::signup))
        .route("/Users/login", post(users::login))
        .route("/Users/me", get(users::me))
        .with_state(state);

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(middleware)
}
