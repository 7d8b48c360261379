//! High-level entity actions: build, sign, submit and confirm in one call.

use std::sync::Arc;

use crate::config::ConfirmationConfig;
use crate::ledger::batch::BatchBuilder;
use crate::ledger::handle::LedgerHandle;
use crate::ledger::protocol::Batch;
use crate::ledger::signer::Signer;
use crate::ledger::transaction::{Action, TransactionBuilder};
use crate::ledger::types::{LedgerResult, Outcome};
use crate::resilience::retries::{submit_and_wait, ConfirmationPolicy};

/// Performs entity actions against the current ledger endpoint.
#[derive(Debug, Clone)]
pub struct EntityActions {
    handle: Arc<LedgerHandle>,
    transactions: TransactionBuilder,
    batches: BatchBuilder,
}

impl EntityActions {
    /// Use `signer` both for transactions and for the batch wrapping them.
    pub fn new(handle: Arc<LedgerHandle>, signer: Signer) -> Self {
        Self {
            handle,
            transactions: TransactionBuilder::new(signer.clone()),
            batches: BatchBuilder::new(signer),
        }
    }

    /// Build a signed single-transaction batch.
    pub fn prepare(&self, name: &str, action: Action, argument: Option<&str>) -> LedgerResult<Batch> {
        let transaction = self.transactions.build(name, action, argument)?;
        self.batches.build(vec![transaction])
    }

    /// Run `action` and report the status from a single poll.
    pub async fn perform(
        &self,
        name: &str,
        action: Action,
        argument: Option<&str>,
    ) -> LedgerResult<Outcome> {
        let batch = self.prepare(name, action, argument)?;
        let client = self.handle.client();
        client.submit_and_confirm(&batch, client.wait_secs()).await
    }

    /// Create the entity `name`.
    pub async fn create_entity(&self, name: &str) -> LedgerResult<Outcome> {
        self.perform(name, Action::Create, None).await
    }

    /// Take `space` from the entity `name`.
    pub async fn take_space(&self, name: &str, space: &str) -> LedgerResult<Outcome> {
        self.perform(name, Action::Take, Some(space)).await
    }

    /// Run `action` and keep polling until the batch commits, is rejected,
    /// or the confirmation bound is exhausted.
    pub async fn perform_and_wait(
        &self,
        name: &str,
        action: Action,
        argument: Option<&str>,
        confirmation: &ConfirmationConfig,
    ) -> LedgerResult<Outcome> {
        let batch = self.prepare(name, action, argument)?;
        let client = self.handle.client();
        let policy = ConfirmationPolicy::from_config(confirmation, client.wait_secs());
        submit_and_wait(&client, &batch, &policy).await
    }

    pub fn handle(&self) -> &Arc<LedgerHandle> {
        &self.handle
    }
}
