use crate::response::{error_response, success_response};
use crate::routes::common::{ApiJson, database_error, is_unique_violation};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Response};
use common::format_validation_errors;
use db::models::category;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Category name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

/// POST /categories
///
/// ### Request Body
/// ```json
/// { "name": "Web Development", "description": "Servers, browsers and everything between" }
/// ```
///
/// ### Responses
/// - `201 Created` with the category
/// - `400 Bad Request` validation failure
/// - `403 Forbidden` the caller is not an admin
/// - `409 Conflict` a category with this name already exists
pub async fn create_category(
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<CreateCategoryRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, format_validation_errors(&e));
    }
    if req.name.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Category name is required");
    }

    match category::Model::create(app_state.db(), &req.name, &req.description).await {
        Ok(created) => success_response(
            StatusCode::CREATED,
            created,
            "Category created successfully",
        ),
        Err(e) if is_unique_violation(&e) => error_response(
            StatusCode::CONFLICT,
            "A category with this name already exists",
        ),
        Err(e) => database_error("Failed to create category", e),
    }
}
