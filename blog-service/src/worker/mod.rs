//! Post-processing worker.
//!
//! The worker shares no memory with the API. It polls over HTTP for
//! unprocessed posts and reports each one back as processed.

pub mod client;
pub mod poller;

pub use client::{ApiClient, ClientError};
pub use poller::{run, run_cycle, CycleReport, PollSettings};
