//! Bounded confirmation polling.
//!
//! A single status poll may legitimately answer PENDING or UNKNOWN. This
//! module keeps polling, with backoff, until the batch commits or is
//! rejected, or the attempt budget runs out. A failed poll ends the wait
//! with that poll's error.

use tokio::time::sleep;

use crate::config::ConfirmationConfig;
use crate::ledger::client::LedgerClient;
use crate::ledger::protocol::Batch;
use crate::ledger::types::{BatchStatus, LedgerError, LedgerResult, Outcome};
use crate::resilience::backoff::PollBackoff;

/// How long to keep asking about a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    /// Total status polls, including the first.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Server-side long-poll budget per poll.
    pub wait_secs: u64,
}

impl ConfirmationPolicy {
    pub fn from_config(config: &ConfirmationConfig, wait_secs: u64) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
            wait_secs,
        }
    }
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self::from_config(&ConfirmationConfig::default(), 5)
    }
}

/// Poll `batch_id` until it is committed.
///
/// INVALID ends the wait with `Rejected`. PENDING and UNKNOWN consume
/// attempts. Poll errors are returned as they are.
pub async fn wait_for_commit(
    client: &LedgerClient,
    batch_id: &str,
    policy: &ConfirmationPolicy,
) -> LedgerResult<()> {
    let max_attempts = policy.max_attempts.max(1);
    let mut backoff = PollBackoff::new(policy.base_delay_ms, policy.max_delay_ms);

    for attempt in 1..=max_attempts {
        match client.poll_status(batch_id, policy.wait_secs).await? {
            BatchStatus::Committed => return Ok(()),
            BatchStatus::Invalid { message } => return Err(LedgerError::Rejected(message)),
            status => tracing::debug!(
                batch_id = %batch_id,
                attempt = attempt,
                status = status.code(),
                "Batch not final yet"
            ),
        }

        if attempt < max_attempts {
            sleep(backoff.next_delay()).await;
        }
    }

    tracing::warn!(batch_id = %batch_id, attempts = max_attempts, "Batch still not committed");
    Err(LedgerError::ConfirmationTimeout {
        batch_id: batch_id.to_string(),
        attempts: max_attempts,
    })
}

/// Submit `batch` once, then wait for it to commit.
pub async fn submit_and_wait(
    client: &LedgerClient,
    batch: &Batch,
    policy: &ConfirmationPolicy,
) -> LedgerResult<Outcome> {
    let batch_id = client.submit(batch).await?;
    wait_for_commit(client, &batch_id, policy).await?;
    Ok(Outcome {
        batch_id,
        status: BatchStatus::Committed,
    })
}
