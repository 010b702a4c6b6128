pub mod books;
pub mod health;
pub mod user_books;
pub mod users;
pub mod view;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Catalog
        .route("/books", get(books::list_books))
        .route("/books/:id", get(books::get_book))
        .route("/books/:id/palette", get(books::get_palette))
        .route("/user-books", get(user_books::list_user_books))
        .route("/users", get(users::list_users))
        // View state
        .route("/view", get(view::initial_view).post(view::replay_view))
        .with_state(state)
}

/// Translate a domain failure into a JSON error body.
pub(crate) fn error_response(e: DomainError) -> Response {
    let status = match &e {
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Database(_) | DomainError::Mapping(_) | DomainError::Internal(_) => {
            tracing::error!("Request failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(json!({ "error": e.to_string() }))).into_response()
}
