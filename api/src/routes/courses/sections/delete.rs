use crate::response::{Empty, error_response, success_response};
use crate::routes::common::database_error;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use db::models::section;

/// DELETE /courses/{course_id}/sections/{section_id}
///
/// Deletes a section and its lectures.
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found` the section does not belong to this course
pub async fn delete_section(
    State(app_state): State<AppState>,
    Path((course_id, section_id)): Path<(i64, i64)>,
) -> Response {
    let db = app_state.db();

    match section::Model::find_in_course(db, course_id, section_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Section not found"),
        Err(e) => return database_error("Failed to load section", e),
    }

    match section::Model::delete(db, section_id).await {
        Ok(()) => success_response(StatusCode::OK, Empty, "Section deleted successfully"),
        Err(e) => database_error("Failed to delete section", e),
    }
}
