use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use super::error_response;
use crate::infrastructure::AppState;

#[utoipa::path(
    get,
    path = "/api/user-books",
    responses(
        (status = 200, description = "Reading records with their book and user")
    )
)]
pub async fn list_user_books(State(state): State<AppState>) -> impl IntoResponse {
    match state.user_book_repo.list_user_books().await {
        Ok(user_books) => Json(json!({
            "total": user_books.len(),
            "user_books": user_books,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}
