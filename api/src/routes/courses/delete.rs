use crate::response::{Empty, success_response};
use crate::routes::common::database_error;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use db::models::course;

/// DELETE /courses/{course_id}
///
/// Deletes a course with its sections, lectures, enrolments, progress and ratings.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// { "success": true, "data": null, "message": "Course deleted successfully" }
/// ```
/// - `403 Forbidden` not the instructor or an admin
/// - `404 Not Found` unknown course
pub async fn delete_course(
    State(app_state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Response {
    if let Err(e) = course::Model::delete(app_state.db(), course_id).await {
        return database_error("Failed to delete course", e);
    }

    tracing::info!(course_id, "Course deleted");
    success_response(StatusCode::OK, Empty, "Course deleted successfully")
}
