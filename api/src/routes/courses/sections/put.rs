use crate::response::{error_response, success_response};
use crate::routes::common::{ApiJson, database_error};
use crate::routes::courses::sections::post::SectionRequest;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use db::models::section;

/// PUT /courses/{course_id}/sections/{section_id}
///
/// Renames a section.
///
/// ### Responses
/// - `200 OK` with the section
/// - `400 Bad Request` empty name
/// - `404 Not Found` the section does not belong to this course
pub async fn edit_section(
    State(app_state): State<AppState>,
    Path((course_id, section_id)): Path<(i64, i64)>,
    ApiJson(req): ApiJson<SectionRequest>,
) -> Response {
    let name = match req.checked() {
        Ok(name) => name,
        Err(resp) => return resp,
    };
    let db = app_state.db();

    match section::Model::find_in_course(db, course_id, section_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Section not found"),
        Err(e) => return database_error("Failed to load section", e),
    }

    match section::Model::rename(db, section_id, name).await {
        Ok(updated) => success_response(StatusCode::OK, updated, "Section updated successfully"),
        Err(e) => database_error("Failed to update section", e),
    }
}
