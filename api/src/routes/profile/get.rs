use crate::auth::CurrentUser;
use crate::response::success_response;
use crate::routes::common::{UserWithProfile, database_error};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Response};
use db::dashboard;

/// GET /profile
///
/// Returns the caller with their profile details.
pub async fn get_profile(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Response {
    match UserWithProfile::load(app_state.db(), user).await {
        Ok(data) => success_response(StatusCode::OK, data, "Profile retrieved successfully"),
        Err(e) => database_error("Failed to load profile", e),
    }
}

/// GET /profile/enrolled-courses
///
/// Courses the student is enrolled in, most recent enrolment first.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": [
///     {
///       "id": 3,
///       "course_name": "Rust for Backend Developers",
///       "course_description": "Build web services with axum",
///       "thumbnail": "http://127.0.0.1:4000/media/notewrite/thumbnails/2b1f_cover.png",
///       "instructor_id": 2,
///       "total_duration": "1h 5m",
///       "total_sub_sections": 12,
///       "completed_sub_sections": 3,
///       "progress_percentage": 25.0
///     }
///   ],
///   "message": "Enrolled courses retrieved successfully"
/// }
/// ```
/// - `403 Forbidden` the caller is not a student
pub async fn get_enrolled_courses(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Response {
    match dashboard::enrolled_courses(app_state.db(), user.id).await {
        Ok(courses) => success_response(
            StatusCode::OK,
            courses,
            "Enrolled courses retrieved successfully",
        ),
        Err(e) => database_error("Failed to load enrolled courses", e),
    }
}

/// GET /profile/instructor-dashboard
///
/// Per-course enrolment counts and revenue for the calling teacher.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": [
///     {
///       "id": 3,
///       "course_name": "Rust for Backend Developers",
///       "price": 499,
///       "status": "published",
///       "total_students_enrolled": 4,
///       "total_amount_generated": 1996
///     }
///   ],
///   "message": "Instructor dashboard retrieved successfully"
/// }
/// ```
/// - `403 Forbidden` the caller is not a teacher
pub async fn get_instructor_dashboard(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Response {
    match dashboard::instructor_dashboard(app_state.db(), user.id).await {
        Ok(stats) => success_response(
            StatusCode::OK,
            stats,
            "Instructor dashboard retrieved successfully",
        ),
        Err(e) => database_error("Failed to load instructor dashboard", e),
    }
}
