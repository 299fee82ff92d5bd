use crate::auth::CurrentUser;
use crate::response::success_response;
use crate::routes::common::{UserWithProfile, database_error};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Response};

/// GET /auth/me
///
/// Returns the authenticated user with their profile.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "id": 1,
///     "first_name": "Ada",
///     "last_name": "Lovelace",
///     "email": "ada@example.com",
///     "account_type": "student",
///     "image": "https://api.dicebear.com/5.x/initials/svg?seed=Ada%20Lovelace",
///     "created_at": "2025-05-23T18:00:00Z",
///     "updated_at": "2025-05-23T18:00:00Z",
///     "profile": { "id": 1, "user_id": 1, "gender": null, "date_of_birth": null, "about": null, "contact_number": null }
///   },
///   "message": "User data retrieved successfully"
/// }
/// ```
/// - `401 Unauthorized` missing or invalid token, or the account no longer exists
pub async fn get_me(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Response {
    match UserWithProfile::load(app_state.db(), user).await {
        Ok(data) => success_response(StatusCode::OK, data, "User data retrieved successfully"),
        Err(e) => database_error("Failed to load profile", e),
    }
}
