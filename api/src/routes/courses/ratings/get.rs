use crate::response::{error_response, success_response};
use crate::routes::common::database_error;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use db::models::{course, rating_review};

/// GET /courses/{course_id}/ratings/average
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": { "average_rating": 4.33, "count": 3 },
///   "message": "Average rating retrieved successfully"
/// }
/// ```
/// - `404 Not Found` unknown course
pub async fn get_average_rating(
    State(app_state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    match course::Model::find_by_id(db, course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Course not found"),
        Err(e) => return database_error("Failed to load course", e),
    }

    match rating_review::Model::average_for_course(db, course_id).await {
        Ok(average) => success_response(
            StatusCode::OK,
            average,
            "Average rating retrieved successfully",
        ),
        Err(e) => database_error("Failed to compute average rating", e),
    }
}

/// GET /ratings
///
/// Every review with its author and course name, highest rating first.
pub async fn list_reviews(State(app_state): State<AppState>) -> Response {
    match rating_review::Model::list_all(app_state.db()).await {
        Ok(reviews) => success_response(StatusCode::OK, reviews, "Reviews retrieved successfully"),
        Err(e) => database_error("Failed to list reviews", e),
    }
}
