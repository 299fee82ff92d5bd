//! # subsections Routes Module
//!
//! Lectures of a section, nested under
//! `/courses/{course_id}/sections/{section_id}/subsections`.
//!
//! - `POST   /`                   → `create_sub_section`
//! - `PUT    /{sub_section_id}`   → `edit_sub_section`
//! - `DELETE /{sub_section_id}`   → `delete_sub_section`

pub mod delete;
pub mod post;
pub mod put;

use crate::response::error_response;
use crate::routes::common::database_error;
use crate::state::AppState;
use axum::{
    Router,
    http::StatusCode,
    response::Response,
    routing::{delete, post, put},
};
use db::models::section;
use sea_orm::DbConn;

use delete::delete_sub_section;
use post::create_sub_section;
use put::edit_sub_section;

pub fn subsections_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_sub_section))
        .route("/{sub_section_id}", put(edit_sub_section))
        .route("/{sub_section_id}", delete(delete_sub_section))
}

/// Responds `404` unless the section belongs to the course.
pub(crate) async fn ensure_section(
    db: &DbConn,
    course_id: i64,
    section_id: i64,
) -> Result<(), Response> {
    match section::Model::find_in_course(db, course_id, section_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(error_response(StatusCode::NOT_FOUND, "Section not found")),
        Err(e) => Err(database_error("Failed to load section", e)),
    }
}
