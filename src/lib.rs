//! Client core for the Hylesaga transaction family.
//!
//! Builds and signs transactions and batches, submits them to a ledger REST
//! API, confirms their commit status and decodes entity state.

pub mod config;
pub mod ledger;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::ClientConfig;
pub use ledger::{LedgerClient, LedgerError, LedgerHandle, LedgerResult};
