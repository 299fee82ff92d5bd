use crate::auth::CurrentUser;
use crate::response::{Empty, error_response, success_response};
use crate::routes::common::{ApiJson, database_error};
use crate::services::email::{course_enrollment_email, payment_success_email, send_logged};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
};
use common::format_validation_errors;
use db::enrollment::{self, EnrollmentError};
use db::models::payment_order;
use serde::{Deserialize, Serialize};
use util::config::AppConfig;
use validator::Validate;

fn enrollment_error(err: EnrollmentError) -> Response {
    match err {
        EnrollmentError::Database(e) => database_error("Enrolment failed", e),
        EnrollmentError::CourseNotFound(_) | EnrollmentError::OrderNotFound => {
            error_response(StatusCode::NOT_FOUND, err.to_string())
        }
        EnrollmentError::EmptySelection
        | EnrollmentError::NotPublished(_)
        | EnrollmentError::AlreadyEnrolled(_)
        | EnrollmentError::AmountTooLarge
        | EnrollmentError::AlreadyProcessed => {
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CaptureRequest {
    #[serde(default)]
    pub course_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct CaptureResponse {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
}

/// POST /payments/capture
///
/// Opens a gateway order for the selected courses.
///
/// ### Request Body
/// ```json
/// { "course_ids": [3, 7] }
/// ```
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": { "order_id": "order_Nf3k2Lx9", "amount": 149800, "currency": "INR", "key_id": "rzp_test_x" },
///   "message": "Order created successfully"
/// }
/// ```
/// - `400 Bad Request` empty selection, unpublished course, already enrolled, or total too large
/// - `404 Not Found` unknown course
/// - `502 Bad Gateway` the payment gateway refused the order
pub async fn capture_payment(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<CaptureRequest>,
) -> Response {
    let db = app_state.db();

    let courses = match enrollment::validate_purchase(db, user.id, &req.course_ids).await {
        Ok(courses) => courses,
        Err(e) => return enrollment_error(e),
    };
    let course_ids: Vec<i64> = courses.iter().map(|c| c.id).collect();
    let amount = match enrollment::order_amount(&courses) {
        Ok(amount) => amount,
        Err(e) => return enrollment_error(e),
    };
    let currency = AppConfig::global().payment_currency.clone();
    let receipt = format!("rcpt_{}_{}", user.id, uuid::Uuid::new_v4().simple());

    let order = match app_state
        .payments()
        .create_order(amount, &currency, &receipt)
        .await
    {
        Ok(order) => order,
        Err(e) => {
            tracing::error!(error = %e, user_id = user.id, "Could not initiate order");
            return error_response(StatusCode::BAD_GATEWAY, "Could not initiate order");
        }
    };

    if let Err(e) = payment_order::Model::create(
        db,
        &order.id,
        user.id,
        order.amount,
        &order.currency,
        &course_ids,
    )
    .await
    {
        return database_error("Failed to store payment order", e);
    }

    tracing::info!(order_id = %order.id, user_id = user.id, amount = order.amount, "Payment order created");

    let body = CaptureResponse {
        order_id: order.id,
        amount: order.amount,
        currency: order.currency,
        key_id: app_state.payments().key_id().to_owned(),
    };
    success_response(StatusCode::OK, body, "Order created successfully")
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyRequest {
    #[validate(length(min = 1, message = "order_id is required"))]
    pub order_id: String,

    #[validate(length(min = 1, message = "payment_id is required"))]
    pub payment_id: String,

    #[validate(length(min = 1, message = "signature is required"))]
    pub signature: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub order_id: String,
    pub payment_id: String,
    pub enrolled_course_ids: Vec<i64>,
}

/// POST /payments/verify
///
/// Checks the gateway signature for a completed checkout, then enrols the
/// student in every course of the order in one transaction.
///
/// ### Request Body
/// ```json
/// { "order_id": "order_Nf3k2Lx9", "payment_id": "pay_29QQoUBi66xm2f", "signature": "9ef4dffb..." }
/// ```
///
/// ### Responses
/// - `200 OK` with the courses enrolled in
/// - `400 Bad Request` bad signature or order already processed
/// - `404 Not Found` no such order for this student
/// - `502 Bad Gateway` payments are not configured
pub async fn verify_payment(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<VerifyRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, format_validation_errors(&e));
    }

    if !app_state.payments().is_configured() {
        return error_response(StatusCode::BAD_GATEWAY, "Payments are not configured");
    }

    if !app_state
        .payments()
        .verify_signature(&req.order_id, &req.payment_id, &req.signature)
    {
        tracing::warn!(order_id = %req.order_id, user_id = user.id, "Payment signature mismatch");
        return error_response(StatusCode::BAD_REQUEST, "Payment verification failed");
    }

    let (order, courses) =
        match enrollment::settle_order(app_state.db(), user.id, &req.order_id, &req.payment_id)
            .await
        {
            Ok(settled) => settled,
            Err(e) => return enrollment_error(e),
        };

    let full_name = user.full_name();
    for course in &courses {
        send_logged(
            app_state.mailer(),
            course_enrollment_email(&user.email, &full_name, &course.course_name),
        )
        .await;
    }

    tracing::info!(order_id = %order.gateway_order_id, user_id = user.id, courses = courses.len(), "Payment verified");

    let body = VerifyResponse {
        order_id: order.gateway_order_id,
        payment_id: req.payment_id,
        enrolled_course_ids: courses.iter().map(|c| c.id).collect(),
    };
    success_response(StatusCode::OK, body, "Payment verified")
}

#[derive(Debug, Deserialize, Validate)]
pub struct SuccessEmailRequest {
    #[validate(length(min = 1, message = "order_id is required"))]
    pub order_id: String,

    #[validate(length(min = 1, message = "payment_id is required"))]
    pub payment_id: String,

    /// Minor currency units, as returned by `/payments/capture`.
    #[validate(range(min = 0, message = "amount cannot be negative"))]
    pub amount: i64,
}

/// POST /payments/success-email
///
/// Emails the student a payment receipt.
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` missing field
/// - `502 Bad Gateway` the email could not be delivered
pub async fn send_payment_success_email(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<SuccessEmailRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, format_validation_errors(&e));
    }

    let mail = payment_success_email(
        &user.email,
        &user.full_name(),
        req.amount as f64 / 100.0,
        &req.order_id,
        &req.payment_id,
    );
    if let Err(e) = app_state.mailer().send(mail).await {
        tracing::error!(error = %e, user_id = user.id, "Failed to send payment receipt");
        return error_response(StatusCode::BAD_GATEWAY, "Could not send email");
    }

    success_response(StatusCode::OK, Empty, "Payment receipt sent")
}
