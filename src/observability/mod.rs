//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! ledger client, builders, state reader produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (request counters, latency histograms, batch outcomes)
//! ```
//!
//! # Design Decisions
//! - Key material never reaches a log line; public keys and ids only
//! - The library records metrics but never installs an exporter

pub mod logging;
pub mod metrics;
