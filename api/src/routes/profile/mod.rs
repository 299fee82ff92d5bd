//! # profile Routes Module
//!
//! The caller's own account: profile details, avatar, deletion and dashboards.
//!
//! ## Structure
//! - `get.rs`: profile, enrolled courses, instructor dashboard
//! - `put.rs`: profile details and display picture
//! - `delete.rs`: account deletion

pub mod delete;
pub mod get;
pub mod put;

use crate::auth::guards::{allow_authenticated, allow_student, allow_teacher};
use crate::state::AppState;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, put},
};

use delete::delete_account;
use get::{get_enrolled_courses, get_instructor_dashboard, get_profile};
use put::{update_display_picture, update_profile};

/// Builds the `/profile` route group.
///
/// - `GET /profile` → `get_profile`
/// - `PUT /profile` → `update_profile`
/// - `DELETE /profile` → `delete_account`
/// - `PUT /profile/display-picture` → `update_display_picture`
/// - `GET /profile/enrolled-courses` → `get_enrolled_courses` (students)
/// - `GET /profile/instructor-dashboard` → `get_instructor_dashboard` (teachers)
pub fn profile_routes(app_state: AppState) -> Router<AppState> {
    let account = Router::new()
        .route(
            "/",
            get(get_profile).put(update_profile).delete(delete_account),
        )
        .route("/display-picture", put(update_display_picture))
        .route_layer(from_fn_with_state(app_state.clone(), allow_authenticated));

    let student = Router::new()
        .route("/enrolled-courses", get(get_enrolled_courses))
        .route_layer(from_fn_with_state(app_state.clone(), allow_student));

    let teacher = Router::new()
        .route("/instructor-dashboard", get(get_instructor_dashboard))
        .route_layer(from_fn_with_state(app_state, allow_teacher));

    account.merge(student).merge(teacher)
}
