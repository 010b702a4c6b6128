//! Book API handlers using repository pattern

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use super::error_response;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::models::Book;
use crate::services::{Rgb, Scheme, TextColor};

#[utoipa::path(
    get,
    path = "/api/books",
    responses(
        (status = 200, description = "All books, newest first, with reading records")
    )
)]
pub async fn list_books(State(state): State<AppState>) -> impl IntoResponse {
    match state.book_repo.list_books().await {
        Ok(books) => Json(json!({
            "total": books.len(),
            "books": books,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = String, Path, description = "Book id or slug")),
    responses(
        (status = 200, description = "Book found", body = Book),
        (status = 404, description = "No book with that id or slug")
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match find_book(&state, &id).await {
        Ok(book) => (StatusCode::OK, Json(json!({ "book": book }))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn find_book(state: &AppState, key: &str) -> Result<Book, DomainError> {
    state
        .book_repo
        .find_by_id_or_slug(key)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Book {}", key)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaletteSource {
    /// Extracted from the cover image
    Image,
    /// Cover missing or unreadable; derived from the title color
    Fallback,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaletteResponse {
    pub book_id: String,
    pub dominant: Rgb,
    /// CSS `rgb(...)` after desaturation
    pub background_color: String,
    pub text_color: TextColor,
    pub source: PaletteSource,
}

#[utoipa::path(
    get,
    path = "/api/books/{id}/palette",
    params(("id" = String, Path, description = "Book id or slug")),
    responses(
        (status = 200, description = "Colors for the detail view", body = PaletteResponse),
        (status = 404, description = "No book with that id or slug")
    )
)]
pub async fn get_palette(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let book = match find_book(&state, &id).await {
        Ok(book) => book,
        Err(e) => return error_response(e),
    };

    let (dominant, source) = match cover_color(&state, &book).await {
        Some(rgb) => (rgb, PaletteSource::Image),
        None => match Rgb::from_hex(&book.color) {
            Some(rgb) => (rgb, PaletteSource::Fallback),
            None => {
                return error_response(DomainError::Internal(format!(
                    "invalid generated color {} for book {}",
                    book.color, book.id
                )))
            }
        },
    };

    let scheme = Scheme::from_dominant(dominant);
    Json(PaletteResponse {
        book_id: book.id,
        dominant,
        background_color: scheme.background.to_css(),
        text_color: scheme.text,
        source,
    })
    .into_response()
}

/// Dominant cover color, or `None` when it cannot be extracted.
pub(crate) async fn cover_color(state: &AppState, book: &Book) -> Option<Rgb> {
    match state.covers.dominant_color(book.image_url.as_deref()).await {
        Ok(rgb) => Some(rgb),
        Err(e) => {
            tracing::debug!("No cover color for {}: {}", book.id, e);
            None
        }
    }
}
