//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, borrows, genres, health, members, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "1.0.0",
        description = "Library lending REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Members
        members::list_members,
        members::get_member,
        members::create_member,
        members::update_member,
        members::delete_member,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::delete_author,
        // Genres
        genres::list_genres,
        genres::get_genre,
        genres::create_genre,
        genres::delete_genre,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::delete_book,
        // Borrows
        borrows::list_borrows,
        borrows::get_borrow,
        borrows::create_borrow,
        borrows::return_borrow,
        borrows::delete_borrow,
        // Users
        users::signup,
        users::login,
        users::me,
    ),
    components(
        schemas(
            crate::models::member::Member,
            crate::models::member::CreateMember,
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            crate::models::genre::Genre,
            crate::models::genre::CreateGenre,
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::borrow::Borrow,
            crate::models::borrow::CreateBorrow,
            crate::models::user::User,
            crate::models::user::Credentials,
            crate::models::user::LoginResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "members", description = "Library members"),
        (name = "authors", description = "Authors"),
        (name = "genres", description = "Genres"),
        (name = "books", description = "Book catalog"),
        (name = "borrows", description = "Loans of books to members"),
        (name = "users", description = "Accounts and login")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
