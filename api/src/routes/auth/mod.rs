//! # auth Routes Module
//!
//! Routes for the `/auth` endpoint group.
//!
//! ## Structure
//! - `post.rs`: OTP, signup, login and password handlers
//! - `get.rs`: the current user
//!
//! `/me` and `/change-password` sit behind `allow_authenticated`; the rest are public.

pub mod get;
pub mod post;

use crate::auth::guards::allow_authenticated;
use crate::state::AppState;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use get::get_me;
use post::{change_password, login, reset_password, reset_password_token, send_otp, signup};

/// Builds the `/auth` route group.
///
/// - `POST /auth/send-otp` → `send_otp`
/// - `POST /auth/signup` → `signup`
/// - `POST /auth/login` → `login`
/// - `POST /auth/reset-password-token` → `reset_password_token`
/// - `POST /auth/reset-password` → `reset_password`
/// - `GET /auth/me` → `get_me` (authenticated)
/// - `POST /auth/change-password` → `change_password` (authenticated)
pub fn auth_routes(app_state: AppState) -> Router<AppState> {
    let authenticated = Router::new()
        .route("/me", get(get_me))
        .route("/change-password", post(change_password))
        .route_layer(from_fn_with_state(app_state, allow_authenticated));

    Router::new()
        .route("/send-otp", post(send_otp))
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/reset-password-token", post(reset_password_token))
        .route("/reset-password", post(reset_password))
        .merge(authenticated)
}
