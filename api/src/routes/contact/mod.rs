//! # contact Routes Module
//!
//! - `POST /contact` → `send_contact_message` (public)

pub mod post;

use crate::state::AppState;
use axum::{Router, routing::post};

use post::send_contact_message;

pub fn contact_routes() -> Router<AppState> {
    Router::new().route("/", post(send_contact_message))
}
