use crate::response::{error_response, success_response};
use crate::routes::common::{ApiJson, database_error};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use common::format_validation_errors;
use db::models::section;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SectionRequest {
    #[validate(length(min = 1, max = 200, message = "Section name is required"))]
    pub section_name: String,
}

impl SectionRequest {
    pub(crate) fn checked(&self) -> Result<&str, Response> {
        if let Err(e) = self.validate() {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                format_validation_errors(&e),
            ));
        }
        let name = self.section_name.trim();
        if name.is_empty() {
            return Err(error_response(StatusCode::BAD_REQUEST, "Section name is required"));
        }
        Ok(name)
    }
}

/// POST /courses/{course_id}/sections
///
/// Appends a section to the end of the course.
///
/// ### Request Body
/// ```json
/// { "section_name": "Getting started" }
/// ```
///
/// ### Responses
/// - `201 Created`
/// ```json
/// {
///   "success": true,
///   "data": { "id": 5, "course_id": 3, "section_name": "Getting started", "position": 1 },
///   "message": "Section created successfully"
/// }
/// ```
/// - `400 Bad Request` empty name
pub async fn create_section(
    State(app_state): State<AppState>,
    Path(course_id): Path<i64>,
    ApiJson(req): ApiJson<SectionRequest>,
) -> Response {
    let name = match req.checked() {
        Ok(name) => name,
        Err(resp) => return resp,
    };

    match section::Model::create(app_state.db(), course_id, name).await {
        Ok(created) => success_response(StatusCode::CREATED, created, "Section created successfully"),
        Err(e) => database_error("Failed to create section", e),
    }
}
