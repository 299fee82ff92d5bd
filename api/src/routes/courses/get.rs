use crate::auth::CurrentUser;
use crate::response::{error_response, success_response};
use crate::routes::common::database_error;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use db::catalog;
use db::models::course;
use db::progress::completed_sub_sections;

/// GET /courses
///
/// Published courses, newest first.
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
///       "price": 499,
///       "thumbnail": "http://127.0.0.1:4000/media/thumbnails/2b1f-cover.png",
///       "category_id": 1,
///       "status": "published",
///       "tags": ["rust", "backend"],
///       "instructor": { "id": 2, "first_name": "Grace", "last_name": "Hopper", "image": "..." },
///       "students_enrolled": 4,
///       "average_rating": 4.5,
///       "created_at": "2025-05-23T18:00:00Z"
///     }
///   ],
///   "message": "Courses retrieved successfully"
/// }
/// ```
pub async fn list_courses(State(app_state): State<AppState>) -> Response {
    let db = app_state.db();
    let courses = match course::Model::list_published(db).await {
        Ok(courses) => courses,
        Err(e) => return database_error("Failed to list courses", e),
    };

    match catalog::summarize(db, courses).await {
        Ok(cards) => success_response(StatusCode::OK, cards, "Courses retrieved successfully"),
        Err(e) => database_error("Failed to summarize courses", e),
    }
}

/// GET /courses/{course_id}
///
/// Public course page: sections and lectures without video URLs, category,
/// instructor, total duration and average rating.
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found` unknown or unpublished course
pub async fn get_course(
    State(app_state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    let course = match course::Model::find_published(db, course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Course not found"),
        Err(e) => return database_error("Failed to load course", e),
    };

    match catalog::course_details(db, course, false).await {
        Ok(details) => success_response(StatusCode::OK, details, "Course retrieved successfully"),
        Err(e) => database_error("Failed to load course details", e),
    }
}

/// GET /courses/mine
///
/// The calling teacher's courses, drafts included, newest first.
pub async fn get_my_courses(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Response {
    let db = app_state.db();
    let courses = match course::Model::list_by_instructor(db, user.id).await {
        Ok(courses) => courses,
        Err(e) => return database_error("Failed to list instructor courses", e),
    };

    match catalog::summarize(db, courses).await {
        Ok(cards) => success_response(StatusCode::OK, cards, "Courses retrieved successfully"),
        Err(e) => database_error("Failed to summarize courses", e),
    }
}

/// GET /courses/{course_id}/full
///
/// Full course content including video URLs and the lectures the caller has
/// completed (`completed_videos`).
///
/// ### Responses
/// - `200 OK`
/// - `403 Forbidden` not enrolled, not the instructor and not an admin
/// - `404 Not Found` unknown course
pub async fn get_full_course(
    State(app_state): State<AppState>,
    Path(course_id): Path<i64>,
    CurrentUser(user): CurrentUser,
) -> Response {
    let db = app_state.db();
    let course = match course::Model::find_by_id(db, course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Course not found"),
        Err(e) => return database_error("Failed to load course", e),
    };

    let mut details = match catalog::course_details(db, course, true).await {
        Ok(details) => details,
        Err(e) => return database_error("Failed to load course details", e),
    };

    match completed_sub_sections(db, user.id, course_id).await {
        Ok(done) => details.completed_videos = Some(done),
        Err(e) => return database_error("Failed to load progress", e),
    }

    success_response(StatusCode::OK, details, "Course retrieved successfully")
}
