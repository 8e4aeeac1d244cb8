//! Blog Pipeline - in-memory blog API with a polling post processor.
//!
//! This library provides shared modules for the two binaries:
//! - `blog-api`: HTTP API owning the post store
//! - `blog-worker`: Poller that marks unprocessed posts as processed
//!
//! ## Architecture
//!
//! ```text
//! Client → blog-api (POST /posts) → PostStore
//! blog-worker → GET /posts?unprocessed=true → process each → PATCH /posts/{id}
//! ```

pub mod config;
pub mod store;
pub mod web;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use store::{Post, PostFilter, PostStore, StoreError};
pub use web::AppState;
pub use worker::{ApiClient, ClientError, CycleReport, PollSettings};
