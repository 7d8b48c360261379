//! Batch construction.
//!
//! A batch commits atomically: the ledger applies every listed transaction
//! or none. Transaction ids appear in the header in exactly the order the
//! caller supplied them.

use prost::Message;

use crate::ledger::protocol::{Batch, BatchHeader, BatchList, Transaction};
use crate::ledger::signer::Signer;
use crate::ledger::types::{LedgerError, LedgerResult};

/// Wraps signed transactions into signed batches.
#[derive(Debug, Clone)]
pub struct BatchBuilder {
    signer: Signer,
}

impl BatchBuilder {
    pub fn new(signer: Signer) -> Self {
        Self { signer }
    }

    /// Build and sign a batch over `transactions`, preserving their order.
    pub fn build(&self, transactions: Vec<Transaction>) -> LedgerResult<Batch> {
        if transactions.is_empty() {
            return Err(LedgerError::Validation(
                "A batch needs at least one transaction".into(),
            ));
        }

        let header = BatchHeader {
            signer_public_key: self.signer.public_key().to_string(),
            transaction_ids: transactions.iter().map(|t| t.id().to_string()).collect(),
        };
        let header_bytes = header.encode_to_vec();
        let header_signature = self.signer.sign(&header_bytes)?;

        tracing::debug!(
            batch_id = %header_signature,
            transactions = transactions.len(),
            "Batch signed"
        );

        Ok(Batch {
            header: header_bytes,
            header_signature,
            transactions,
            trace: false,
        })
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }
}

impl From<Batch> for BatchList {
    fn from(batch: Batch) -> Self {
        BatchList {
            batches: vec![batch],
        }
    }
}
