//! Post entity and list filters.

use serde::{Deserialize, Serialize};

/// A blog post.
///
/// The same type is serialized by the API and decoded by the worker, so both
/// sides agree on the wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Store-assigned identifier, starting at 1
    pub id: u64,
    pub title: String,
    pub text: String,
    /// Set once by mark-processed, never cleared
    pub processed: bool,
}

/// Which posts a listing should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostFilter {
    #[default]
    All,
    Unprocessed,
}

impl PostFilter {
    pub fn matches(self, post: &Post) -> bool {
        match self {
            PostFilter::All => true,
            PostFilter::Unprocessed => !post.processed,
        }
    }
}
