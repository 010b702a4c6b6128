use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use super::error_response;
use crate::infrastructure::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    /// Configured display name, or the username when none is set
    pub display_name: String,
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users ordered by username")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    match state.user_repo.list_users().await {
        Ok(users) => {
            let users: Vec<UserSummary> = users
                .into_iter()
                .map(|u| UserSummary {
                    display_name: state.display_names.display_name(&u.username).to_string(),
                    id: u.id,
                    username: u.username,
                })
                .collect();
            Json(json!({
                "total": users.len(),
                "users": users,
            }))
            .into_response()
        }
        Err(e) => error_response(e),
    }
}
