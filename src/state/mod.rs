//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `WorkerState`: the phase a worker is in while handling one address
//!   (idle, fetching, persisting, extracting, enqueuing, stopped)

mod worker_state;

// Re-export main types
pub use worker_state::WorkerState;
