//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Cancellation (cancel.rs):
//!     CancelSource::cancel → every CancelToken observes it
//!     → cancellable() drops the in-flight future and returns Cancelled
//! ```
//!
//! # Design Decisions
//! - Dropping a request future aborts the underlying HTTP call
//! - A cancelled operation never yields a late result

pub mod cancel;

pub use cancel::{cancellable, CancelSource, CancelToken};
