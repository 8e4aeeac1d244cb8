//! In-memory post store guarded by a single mutex.
//!
//! The store is cloneable and shared across request handlers. Every operation
//! holds the lock for its full read-modify-write and does no I/O while holding
//! it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use super::post::{Post, PostFilter};

/// Errors returned by store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("post {0} not found")]
    NotFound(u64),
}

/// Shared in-memory post collection.
#[derive(Clone, Default)]
pub struct PostStore {
    inner: Arc<Mutex<StoreInner>>,
}

struct StoreInner {
    posts: Vec<Post>,
    next_id: u64,
}

impl Default for StoreInner {
    fn default() -> Self {
        Self {
            posts: Vec::new(),
            next_id: 1,
        }
    }
}

impl PostStore {
    /// Create an empty store. The first post gets id 1.
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation is a single push or field assignment; a poisoned lock
    // still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a new unprocessed post and return it.
    ///
    /// Callers validate `title` and `text` before calling.
    pub fn create(&self, title: String, text: String) -> Post {
        let mut inner = self.lock();

        let post = Post {
            id: inner.next_id,
            title,
            text,
            processed: false,
        };
        inner.next_id += 1;
        inner.posts.push(post.clone());

        post
    }

    /// Snapshot of the posts matching `filter`, in insertion order.
    pub fn list(&self, filter: PostFilter) -> Vec<Post> {
        self.lock()
            .posts
            .iter()
            .filter(|post| filter.matches(post))
            .cloned()
            .collect()
    }

    /// Flag the post with `id` as processed and return its updated state.
    ///
    /// Marking an already-processed post succeeds and leaves it processed.
    pub fn mark_processed(&self, id: u64) -> Result<Post, StoreError> {
        let mut inner = self.lock();

        let post = inner
            .posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or(StoreError::NotFound(id))?;
        post.processed = true;

        Ok(post.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
