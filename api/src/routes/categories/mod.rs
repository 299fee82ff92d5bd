//! # categories Routes Module
//!
//! - `POST /categories` → `create_category` (admin)
//! - `GET /categories` → `list_categories`
//! - `GET /categories/{category_id}/page` → `category_page`

pub mod get;
pub mod post;

use crate::auth::guards::allow_admin;
use crate::state::AppState;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use get::{category_page, list_categories};
use post::create_category;

pub fn categories_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories))
        .route(
            "/",
            post(create_category).route_layer(from_fn_with_state(app_state, allow_admin)),
        )
        .route("/{category_id}/page", get(category_page))
}
