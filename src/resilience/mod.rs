//! Resilience helpers.
//!
//! # Design Decisions
//! - Every external call has a deadline (applied at the call site)
//! - Retries are bounded and only used for the idempotent price lookup
//! - Jittered backoff between attempts

pub mod backoff;

pub use backoff::{calculate_backoff, RetryPolicy};
