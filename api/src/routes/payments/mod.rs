//! # payments Routes Module
//!
//! Checkout for students, under `/payments`. Every route requires a student.
//!
//! - `POST /payments/capture`        → `capture_payment`
//! - `POST /payments/verify`         → `verify_payment`
//! - `POST /payments/success-email`  → `send_payment_success_email`

pub mod post;

use crate::auth::guards::allow_student;
use crate::state::AppState;
use axum::{Router, middleware::from_fn_with_state, routing::post};

use post::{capture_payment, send_payment_success_email, verify_payment};

pub fn payments_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/capture", post(capture_payment))
        .route("/verify", post(verify_payment))
        .route("/success-email", post(send_payment_success_email))
        .route_layer(from_fn_with_state(app_state, allow_student))
}
