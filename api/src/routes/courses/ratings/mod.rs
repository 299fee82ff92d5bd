//! # ratings Routes Module
//!
//! Ratings of a course, nested under `/courses/{course_id}/ratings`.
//!
//! - `POST /`         → `create_rating` (students)
//! - `GET  /average`  → `get_average_rating`
//!
//! The site-wide `GET /ratings` listing reuses `get::list_reviews`.

pub mod get;
pub mod post;

use crate::auth::guards::allow_student;
use crate::state::AppState;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use get::get_average_rating;
use post::create_rating;

pub fn ratings_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(create_rating).route_layer(from_fn_with_state(app_state, allow_student)),
        )
        .route("/average", get(get_average_rating))
}
