//! View-state endpoints
//!
//! Each request builds its own controller over a fresh catalog read; nothing
//! is shared between requests.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::books::cover_color;
use crate::infrastructure::AppState;
use crate::models::Book;
use crate::services::{Location, RecordingHistory, ViewController, ViewEvent, ViewSnapshot};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ViewQuery {
    /// Book id or slug to open
    pub book: Option<String>,
    /// User whose books to group
    pub username: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ViewRequest {
    /// Starting URL, e.g. `/book/abc?username=alice`
    #[serde(default)]
    pub location: String,
    /// Events applied in order
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub events: Vec<ViewEvent>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ViewResponse {
    pub snapshot: ViewSnapshot,
    /// URLs written through history replacement, oldest first
    pub history: Vec<String>,
}

/// Catalog for a view request. A failed read degrades to an empty collection.
async fn load_catalog(state: &AppState) -> Vec<Book> {
    match state.book_repo.list_books().await {
        Ok(books) => books,
        Err(e) => {
            tracing::error!("Failed to load catalog for view: {}", e);
            Vec::new()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/view",
    params(ViewQuery),
    responses(
        (status = 200, description = "Initial view state", body = ViewSnapshot)
    )
)]
pub async fn initial_view(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> impl IntoResponse {
    let location = Location {
        book: query.book.filter(|b| !b.is_empty()),
        username: query.username.filter(|u| !u.is_empty()),
    };

    let books = load_catalog(&state).await;
    let mut controller = ViewController::new(books, location, RecordingHistory::default());

    if let Some(book) = controller.current().cloned() {
        let rgb = cover_color(&state, &book).await;
        controller.dispatch(ViewEvent::Color { book_id: book.id, rgb });
    }

    Json(controller.snapshot(&state.display_names))
}

#[utoipa::path(
    post,
    path = "/api/view",
    request_body = ViewRequest,
    responses(
        (status = 200, description = "View state after applying the events", body = ViewResponse)
    )
)]
pub async fn replay_view(
    State(state): State<AppState>,
    Json(request): Json<ViewRequest>,
) -> impl IntoResponse {
    let books = load_catalog(&state).await;
    let mut controller = ViewController::new(
        books,
        Location::parse(&request.location),
        RecordingHistory::default(),
    );

    tracing::debug!("Replaying {} view events", request.events.len());
    for event in request.events {
        controller.dispatch(event);
    }

    let snapshot = controller.snapshot(&state.display_names);
    Json(ViewResponse {
        snapshot,
        history: controller.into_history().into_entries(),
    })
}
