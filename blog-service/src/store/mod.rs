//! Post storage.
//!
//! The store exclusively owns the canonical post collection. Everything else
//! works with cloned snapshots.

pub mod memory;
pub mod post;

pub use memory::{PostStore, StoreError};
pub use post::{Post, PostFilter};
