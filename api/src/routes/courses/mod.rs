//! # courses Routes Module
//!
//! Routes for `/api/courses`, including the nested section, subsection and
//! rating groups.
//!
//! ## Structure
//! - `get.rs`: catalogue listing, course pages, the teacher's own courses
//! - `post.rs`: course creation and progress tracking
//! - `put.rs`: course edits
//! - `delete.rs`: course deletion
//! - `sections/`: `/courses/{course_id}/sections/...`
//! - `ratings/`: `/courses/{course_id}/ratings/...`

pub mod delete;
pub mod get;
pub mod post;
pub mod put;
pub mod ratings;
pub mod sections;

use crate::auth::guards::{allow_course_instructor, allow_enrolled, allow_student, allow_teacher};
use crate::state::AppState;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};

use delete::delete_course;
use get::{get_course, get_full_course, get_my_courses, list_courses};
use post::{create_course, mark_progress};
use put::edit_course;
use ratings::ratings_routes;
use sections::sections_routes;

/// Builds the `/courses` route group.
///
/// Routes:
/// - `GET    /courses`                         → published courses
/// - `POST   /courses`                         → create a course (teachers)
/// - `GET    /courses/mine`                    → the caller's own courses (teachers)
/// - `GET    /courses/{course_id}`             → published course page, no video URLs
/// - `PUT    /courses/{course_id}`             → edit (instructor or admin)
/// - `DELETE /courses/{course_id}`             → delete (instructor or admin)
/// - `GET    /courses/{course_id}/full`        → full course with videos (enrolled, instructor or admin)
/// - `POST   /courses/{course_id}/progress`    → mark a subsection complete (students)
///
/// - Nested section and subsection routes under `/courses/{course_id}/sections` (instructor or admin)
/// - Nested rating routes under `/courses/{course_id}/ratings`
pub fn courses_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses))
        .route(
            "/",
            post(create_course).route_layer(from_fn_with_state(app_state.clone(), allow_teacher)),
        )
        .route(
            "/mine",
            get(get_my_courses).route_layer(from_fn_with_state(app_state.clone(), allow_teacher)),
        )
        .route("/{course_id}", get(get_course))
        .route(
            "/{course_id}",
            put(edit_course).route_layer(from_fn_with_state(
                app_state.clone(),
                allow_course_instructor,
            )),
        )
        .route(
            "/{course_id}",
            delete(delete_course).route_layer(from_fn_with_state(
                app_state.clone(),
                allow_course_instructor,
            )),
        )
        .route(
            "/{course_id}/full",
            get(get_full_course).route_layer(from_fn_with_state(app_state.clone(), allow_enrolled)),
        )
        .route(
            "/{course_id}/progress",
            post(mark_progress).route_layer(from_fn_with_state(app_state.clone(), allow_student)),
        )
        .nest(
            "/{course_id}/sections",
            sections_routes().route_layer(from_fn_with_state(
                app_state.clone(),
                allow_course_instructor,
            )),
        )
        .nest("/{course_id}/ratings", ratings_routes(app_state))
}
