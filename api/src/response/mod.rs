use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Envelope shared by every endpoint:
/// ```json
/// {
///   "success": true,
///   "data": { "id": 7, "course_name": "Rust for Backend Developers" },
///   "message": "Course fetched successfully"
/// }
/// ```
///
/// Failures carry `success: false` and the `Default` value of `T` as `data`.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

/// Placeholder payload for responses that carry no data.
#[derive(Serialize, Default, Debug)]
pub struct Empty;

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Constructs an error response with a message and default `data`.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}

/// Shorthand for `(status, Json(ApiResponse::<Empty>::error(message)))`.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<Empty>::error(message))).into_response()
}

/// Shorthand for a successful envelope with the given status.
pub fn success_response<T: Serialize>(
    status: StatusCode,
    data: T,
    message: impl Into<String>,
) -> Response {
    (status, Json(ApiResponse::success(data, message))).into_response()
}
