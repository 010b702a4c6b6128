use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use sixtybooks::api;
use sixtybooks::config::Config;
use sixtybooks::db;
use sixtybooks::infrastructure::AppState;
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

// Helper to create a test app state
async fn setup_test_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::new(db, &Config::from_env())
}

#[tokio::test]
async fn test_get_book_not_found() {
    let state = setup_test_state().await;

    // Setup Router
    let app = Router::new()
        .route("/books/:id", axum::routing::get(api::books::get_book))
        .route(
            "/books/:id/palette",
            axum::routing::get(api::books::get_palette),
        )
        .with_state(state);

    for uri in ["/books/999", "/books/999/palette", "/books/no-such-slug"] {
        let req = Request::builder()
            .uri(uri)
            .method("GET")
            .body(Body::empty())
            .unwrap();

        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("not found"));
    }
}

#[tokio::test]
async fn test_view_rejects_malformed_events() {
    let state = setup_test_state().await;
    let app = api::api_router(state);

    let req = Request::builder()
        .uri("/view")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"location": "/", "events": [{"type": "teleport"}]}"#))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_view_ignores_unknown_book_and_keys() {
    let state = setup_test_state().await;
    let app = api::api_router(state);

    let req = Request::builder()
        .uri("/view")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "location": "/book/nope",
                "events": [
                    { "type": "key", "key": "Escape" },
                    { "type": "select", "book_id": "nope" }
                ]
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["snapshot"]["placeholder"], true);
    assert_eq!(json["history"].as_array().unwrap().len(), 0);
}
