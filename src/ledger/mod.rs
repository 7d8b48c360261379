//! Ledger client subsystem.
//!
//! # Data Flow
//! ```text
//! action request (name, action, argument)
//!     → address.rs (namespace prefix + entity hash)
//!     → transaction.rs (payload, header, nonce, signature)
//!     → batch.rs (ordered transaction ids, batch signature)
//!     → client.rs (POST /batches → tracking id → GET /batch_statuses)
//!     → Outcome
//!
//! state.rs reads GET /state independently and decodes entity records.
//! ```
//!
//! # Security Constraints
//! - Private keys come from hex strings or environment variables only
//! - Never log private keys; public keys and ids are fine
//! - Every HTTP call has a client-side deadline

pub mod actions;
pub mod address;
pub mod batch;
pub mod client;
pub mod handle;
pub mod protocol;
pub mod signer;
pub mod state;
pub mod transaction;
pub mod types;

pub use actions::EntityActions;
pub use batch::BatchBuilder;
pub use client::LedgerClient;
pub use handle::LedgerHandle;
pub use signer::Signer;
pub use state::StateReader;
pub use transaction::{Action, Payload, TransactionBuilder};
pub use types::{BatchStatus, EntityRecord, LedgerError, LedgerResult, Outcome};
