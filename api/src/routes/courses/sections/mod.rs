//! # sections Routes Module
//!
//! Sections of a course, nested under `/courses/{course_id}/sections`.
//! The course guard is applied by the parent router.
//!
//! - `POST   /`                              → `create_section`
//! - `PUT    /{section_id}`                  → `edit_section`
//! - `DELETE /{section_id}`                  → `delete_section`
//! - `/{section_id}/subsections/...`         → see `subsections`

pub mod delete;
pub mod post;
pub mod put;
pub mod subsections;

use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, post, put},
};

use delete::delete_section;
use post::create_section;
use put::edit_section;
use subsections::subsections_routes;

pub fn sections_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_section))
        .route("/{section_id}", put(edit_section))
        .route("/{section_id}", delete(delete_section))
        .nest("/{section_id}/subsections", subsections_routes())
}
