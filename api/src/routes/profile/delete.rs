use crate::auth::CurrentUser;
use crate::response::{Empty, success_response};
use crate::routes::common::database_error;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Response};
use db::models::user;

/// DELETE /profile
///
/// Deletes the caller's account immediately. Profile, enrolments, progress,
/// ratings and any courses they teach are removed with it.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// { "success": true, "data": null, "message": "Account deleted successfully" }
/// ```
pub async fn delete_account(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Response {
    if let Err(e) = user::Model::delete(app_state.db(), user.id).await {
        return database_error("Failed to delete account", e);
    }

    tracing::info!(user_id = user.id, "Account deleted");
    success_response(StatusCode::OK, Empty, "Account deleted successfully")
}
