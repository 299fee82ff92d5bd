use crate::response::{Empty, error_response, success_response};
use crate::routes::common::database_error;
use crate::routes::courses::sections::subsections::ensure_section;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use db::models::sub_section;

/// DELETE /courses/{course_id}/sections/{section_id}/subsections/{sub_section_id}
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found` the section or lecture is not part of this course
pub async fn delete_sub_section(
    State(app_state): State<AppState>,
    Path((course_id, section_id, sub_section_id)): Path<(i64, i64, i64)>,
) -> Response {
    let db = app_state.db();
    if let Err(resp) = ensure_section(db, course_id, section_id).await {
        return resp;
    }
    match sub_section::Model::find_in_section(db, section_id, sub_section_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Subsection not found"),
        Err(e) => return database_error("Failed to load subsection", e),
    }

    match sub_section::Model::delete(db, sub_section_id).await {
        Ok(()) => success_response(StatusCode::OK, Empty, "Subsection deleted successfully"),
        Err(e) => database_error("Failed to delete subsection", e),
    }
}
