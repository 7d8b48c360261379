//! Ledger-facing types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export LedgerConfig from config module to avoid duplication
pub use crate::config::schema::LedgerConfig;

/// Errors that can occur while building, submitting or reading ledger data.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transport or connectivity failure. Never retried by this crate.
    #[error("Network error: {0}")]
    Network(String),

    /// Ledger answered with a non-success HTTP status.
    #[error("Ledger returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Malformed base64 or a record with the wrong field count.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid key material or signing failure.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Malformed construction input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Response was missing a field the protocol requires.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Batch was rejected by the ledger validator.
    #[error("Batch rejected: {0}")]
    Rejected(String),

    /// No state exists at the queried address.
    #[error("No state found at address {0}")]
    NotFound(String),

    /// Batch did not reach a terminal status within the retry bound.
    #[error("Batch {batch_id} not confirmed after {attempts} status polls")]
    ConfirmationTimeout { batch_id: String, attempts: u32 },

    /// Operation was cancelled before it completed.
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        LedgerError::Network(err.to_string())
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Commit status of a submitted batch, as reported by a single poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    /// Batch is known but not yet committed.
    Pending,
    /// Batch has been committed to the chain.
    Committed,
    /// Batch was rejected; carries the first invalid transaction's message.
    Invalid { message: String },
    /// Ledger has no knowledge of the batch.
    Unknown,
}

impl BatchStatus {
    /// Parse the ledger's status code.
    pub fn from_code(code: &str, invalid_message: Option<String>) -> LedgerResult<Self> {
        match code {
            "PENDING" => Ok(BatchStatus::Pending),
            "COMMITTED" => Ok(BatchStatus::Committed),
            "UNKNOWN" => Ok(BatchStatus::Unknown),
            "INVALID" => Ok(BatchStatus::Invalid {
                message: invalid_message.unwrap_or_else(|| "Batch Invalid".to_string()),
            }),
            other => Err(LedgerError::Protocol(format!(
                "Unhandled batch status '{}'",
                other
            ))),
        }
    }

    /// Status code as the ledger spells it.
    pub fn code(&self) -> &'static str {
        match self {
            BatchStatus::Pending => "PENDING",
            BatchStatus::Committed => "COMMITTED",
            BatchStatus::Invalid { .. } => "INVALID",
            BatchStatus::Unknown => "UNKNOWN",
        }
    }

    /// COMMITTED and INVALID will not change on a later poll.
    pub fn is_final(&self) -> bool {
        matches!(self, BatchStatus::Committed | BatchStatus::Invalid { .. })
    }
}

/// Result of a submit-then-poll round trip, ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Tracking id returned by the submission endpoint.
    pub batch_id: String,
    /// Status observed by the single poll.
    pub status: BatchStatus,
}

impl Outcome {
    /// Only a committed batch counts as success.
    pub fn is_success(&self) -> bool {
        self.status == BatchStatus::Committed
    }

    /// Human-facing message for the observed status.
    pub fn message(&self) -> String {
        match &self.status {
            BatchStatus::Committed => "Batch Successfully Committed".to_string(),
            BatchStatus::Pending => "Batch Pending".to_string(),
            BatchStatus::Invalid { message } => message.clone(),
            BatchStatus::Unknown => "Batch Status Unknown".to_string(),
        }
    }
}

/// A decoded entity state entry.
///
/// State is stored as five comma-separated positional fields; only the
/// first (the entity name) is interpreted by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub name: String,
    pub owner: String,
    pub total_space: String,
    pub taken_space: String,
    pub state: String,
}

impl EntityRecord {
    /// Number of positional fields in an encoded record.
    pub const FIELD_COUNT: usize = 5;

    /// Fields in storage order.
    pub fn fields(&self) -> [&str; Self::FIELD_COUNT] {
        [
            &self.name,
            &self.owner,
            &self.total_space,
            &self.taken_space,
            &self.state,
        ]
    }
}
