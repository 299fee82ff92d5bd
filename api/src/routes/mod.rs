//! HTTP route entry point for `/api/...`.
//!
//! Routes are organized by domain, each protected by the guards in
//! `crate::auth::guards` where needed.
//!
//! Route groups include:
//! - `/health` → Health check endpoint (public)
//! - `/auth` → OTP, signup, login and password endpoints
//! - `/profile` → The caller's account and dashboards (authenticated)
//! - `/categories` → Course categories
//! - `/courses` → Courses, sections, lectures, progress and ratings
//! - `/ratings` → All reviews (public)
//! - `/payments` → Checkout (students)
//! - `/contact` → Contact form (public)

use crate::routes::courses::ratings::get::list_reviews;
use crate::routes::{
    auth::auth_routes, categories::categories_routes, contact::contact_routes,
    courses::courses_routes, health::health_routes, payments::payments_routes,
    profile::profile_routes,
};
use crate::state::AppState;
use axum::{Router, routing::get};

pub mod auth;
pub mod categories;
pub mod common;
pub mod contact;
pub mod courses;
pub mod health;
pub mod payments;
pub mod profile;

/// Builds the complete application router for all HTTP endpoints.
///
/// The state is applied here so the result can be nested under `/api` or
/// driven directly in tests.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes(app_state.clone()))
        .nest("/profile", profile_routes(app_state.clone()))
        .nest("/categories", categories_routes(app_state.clone()))
        .nest("/courses", courses_routes(app_state.clone()))
        .route("/ratings", get(list_reviews))
        .nest("/payments", payments_routes(app_state.clone()))
        .nest("/contact", contact_routes())
        .with_state(app_state)
}
