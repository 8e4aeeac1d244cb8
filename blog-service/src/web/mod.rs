//! HTTP API over the post store.
//!
//! Routes:
//! - `GET /health`
//! - `POST /posts`, `GET /posts[?unprocessed=true]`
//! - `PATCH /posts/{id}` (anything after `/posts/` that is not an integer is a 400)
//!
//! Every route is wrapped in the CORS middleware and request tracing.

pub mod cors;
pub mod error;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, patch},
    Router,
};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use handlers::{
    create_post, health, list_filter, list_posts, mark_processed, AppState, CreatePostRequest,
};

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/", patch(mark_processed))
        .route("/posts/*id", patch(mark_processed))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(cors::cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
