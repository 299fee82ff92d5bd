use crate::auth::CurrentUser;
use crate::response::{error_response, success_response};
use crate::routes::common::{ApiJson, database_error};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use common::format_validation_errors;
use db::models::{
    course,
    rating_review::{self, RatingError},
};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RatingRequest {
    pub rating: i32,

    #[validate(length(min = 1, max = 2000, message = "Review must be 1 to 2000 characters"))]
    pub review: String,
}

/// POST /courses/{course_id}/ratings
///
/// ### Request Body
/// ```json
/// { "rating": 5, "review": "Clear and practical" }
/// ```
///
/// ### Responses
/// - `201 Created` with the review
/// - `400 Bad Request` rating outside 1..=5 or empty review
/// - `403 Forbidden` not enrolled in the course
/// - `404 Not Found` unknown course
/// - `409 Conflict` the student already reviewed this course
pub async fn create_rating(
    State(app_state): State<AppState>,
    Path(course_id): Path<i64>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<RatingRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, format_validation_errors(&e));
    }
    let db = app_state.db();

    match course::Model::find_by_id(db, course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Course not found"),
        Err(e) => return database_error("Failed to load course", e),
    }

    match rating_review::Model::create(db, user.id, course_id, req.rating, &req.review).await {
        Ok(created) => success_response(StatusCode::CREATED, created, "Rating added successfully"),
        Err(RatingError::OutOfRange) => {
            error_response(StatusCode::BAD_REQUEST, "Rating must be between 1 and 5")
        }
        Err(RatingError::NotEnrolled) => {
            error_response(StatusCode::FORBIDDEN, "You are not enrolled in this course")
        }
        Err(RatingError::AlreadyReviewed) => {
            error_response(StatusCode::CONFLICT, "Course already reviewed by this user")
        }
        Err(RatingError::Database(e)) => database_error("Failed to create rating", e),
    }
}
