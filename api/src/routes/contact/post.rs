use crate::response::{Empty, error_response, success_response};
use crate::services::email::{contact_confirmation_email, contact_forward_email};
use crate::routes::common::ApiJson;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Response};
use common::format_validation_errors;
use serde::Deserialize;
use util::config::AppConfig;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 50, message = "First name is required"))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 50, message = "Last name is too long"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 7, max = 15, message = "Phone number must be 7 to 15 characters"))]
    pub phone_number: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
}

/// POST /contact
///
/// Forwards a contact-form message to the support mailbox and confirms
/// receipt to the sender.
///
/// ### Request Body
/// ```json
/// {
///   "first_name": "Ada",
///   "last_name": "Lovelace",
///   "email": "ada@example.com",
///   "phone_number": "5550100",
///   "message": "Do you offer team licences?"
/// }
/// ```
///
/// ### Responses
/// - `200 OK` message sent
/// - `400 Bad Request` validation failure
/// - `502 Bad Gateway` the message could not be delivered
pub async fn send_contact_message(
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<ContactRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, format_validation_errors(&e));
    }

    let support = AppConfig::global().support_email.clone();
    let sender_name = format!("{} {}", req.first_name.trim(), req.last_name.trim())
        .trim()
        .to_owned();
    let forward = contact_forward_email(
        &support,
        &sender_name,
        req.email.trim(),
        req.phone_number.as_deref(),
        &req.message,
    );
    if let Err(e) = app_state.mailer().send(forward).await {
        tracing::error!(error = %e, "Failed to forward contact message");
        return error_response(StatusCode::BAD_GATEWAY, "Could not send your message");
    }

    let confirmation =
        contact_confirmation_email(req.email.trim(), req.first_name.trim(), &req.message);
    if let Err(e) = app_state.mailer().send(confirmation).await {
        tracing::warn!(error = %e, email = %req.email, "Failed to send contact confirmation");
    }

    success_response(StatusCode::OK, Empty, "Message sent successfully")
}
