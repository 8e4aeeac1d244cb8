//! Post endpoint handlers.
//!
//! Handlers validate the request, make exactly one store call and render the
//! result. Failures come back as [`ApiError`], which maps to a status code and
//! a short plain-text body.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::store::{Post, PostFilter, PostStore};
use crate::web::error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: PostStore,
}

impl AppState {
    pub fn new(store: PostStore) -> Self {
        Self { store }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check endpoint.
pub async fn health() -> &'static str {
    "ok"
}

// =============================================================================
// Create
// =============================================================================

/// Body accepted by `POST /posts`.
///
/// Absent and `null` fields both count as empty, so they fail the same check
/// as explicitly empty ones.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Create a post.
///
/// The body is decoded as JSON whatever its `Content-Type`.
pub async fn create_post(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let request: CreatePostRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body_length = body.len(), "post_create_invalid_body");
        ApiError::InvalidBody
    })?;

    let title = request.title.unwrap_or_default();
    let text = request.text.unwrap_or_default();

    if title.is_empty() || text.is_empty() {
        warn!(
            has_title = !title.is_empty(),
            has_text = !text.is_empty(),
            "post_create_missing_fields"
        );
        return Err(ApiError::MissingFields);
    }

    let post = state.store.create(title, text);

    info!(post_id = post.id, title = %post.title, "post_created");

    Ok((StatusCode::CREATED, Json(post)))
}

// =============================================================================
// List
// =============================================================================

/// Pick the list filter from the decoded query pairs.
///
/// Only the first `unprocessed` value counts, and only the literal `true`
/// selects unprocessed posts. Repeated keys are not an error.
pub fn list_filter(query: &[(String, String)]) -> PostFilter {
    match query.iter().find(|(key, _)| key == "unprocessed") {
        Some((_, value)) if value == "true" => PostFilter::Unprocessed,
        _ => PostFilter::All,
    }
}

/// List posts, optionally only the unprocessed ones.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Json<Vec<Post>> {
    let filter = list_filter(&query);
    let posts = state.store.list(filter);

    tracing::debug!(filter = ?filter, count = posts.len(), "posts_listed");

    Json(posts)
}

// =============================================================================
// Mark Processed
// =============================================================================

/// Flag a post as processed.
///
/// Serves both `/posts/` and `/posts/*rest`: whatever follows `/posts/` must be
/// an integer. Integers no post can have (zero, negatives) are not found.
pub async fn mark_processed(
    State(state): State<AppState>,
    path: Option<Path<String>>,
) -> Result<Json<Post>, ApiError> {
    let raw_id = path.map(|Path(raw_id)| raw_id).unwrap_or_default();

    let id: i64 = raw_id.parse().map_err(|_| {
        warn!(raw_id = %raw_id, "post_mark_invalid_id");
        ApiError::InvalidId
    })?;

    let id = u64::try_from(id).map_err(|_| {
        warn!(post_id = id, "post_mark_not_found");
        ApiError::NotFound
    })?;

    let post = state.store.mark_processed(id).map_err(|e| {
        warn!(post_id = id, error = %e, "post_mark_not_found");
        ApiError::from(e)
    })?;

    info!(post_id = post.id, "post_marked_processed");

    Ok(Json(post))
}

/// Fallback for unrouted paths.
pub async fn not_found() -> ApiError {
    ApiError::NoRoute
}
