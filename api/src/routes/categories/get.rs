use crate::response::{error_response, success_response};
use crate::routes::common::database_error;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use db::catalog::{self, CatalogError};
use db::models::category;

/// GET /categories
///
/// All categories ordered by name.
pub async fn list_categories(State(app_state): State<AppState>) -> Response {
    match category::Model::all(app_state.db()).await {
        Ok(categories) => success_response(
            StatusCode::OK,
            categories,
            "Categories retrieved successfully",
        ),
        Err(e) => database_error("Failed to list categories", e),
    }
}

/// GET /categories/{category_id}/page
///
/// Landing page for a category: its published courses, a random other
/// category with published courses, and the best sellers overall.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "selected_category": { "category": { "id": 1, "name": "Web Development" }, "courses": [] },
///     "different_category": { "category": { "id": 2, "name": "Systems" }, "courses": [] },
///     "most_selling_courses": []
///   },
///   "message": "Category page retrieved successfully"
/// }
/// ```
/// - `404 Not Found` unknown category, or it has no published courses
pub async fn category_page(
    State(app_state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Response {
    match catalog::category_page(app_state.db(), category_id).await {
        Ok(page) => success_response(StatusCode::OK, page, "Category page retrieved successfully"),
        Err(CatalogError::Database(e)) => database_error("Failed to build category page", e),
        Err(e) => error_response(StatusCode::NOT_FOUND, e.to_string()),
    }
}
