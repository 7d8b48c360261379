//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Batch submitted (tracking id known):
//!     → retries.rs (poll status; stop on COMMITTED / INVALID / poll error)
//!     → backoff.rs (delay between PENDING / UNKNOWN polls)
//!     → bound exhausted: ConfirmationTimeout
//! ```
//!
//! # Design Decisions
//! - Submission is never retried; a resubmitted batch could commit twice
//! - Only non-final statuses lead to another poll; transport and HTTP
//!   failures go straight back to the caller
//! - Jittered backoff keeps many waiting clients from polling in lockstep

pub mod backoff;
pub mod retries;

pub use backoff::PollBackoff;
pub use retries::{submit_and_wait, wait_for_commit, ConfirmationPolicy};
