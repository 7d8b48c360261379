//! Cancellation coordination for in-flight ledger operations.

use std::future::Future;
use tokio::sync::watch;

use crate::ledger::types::{LedgerError, LedgerResult};

/// Owner side of a cancellation signal.
///
/// Tokens handed out before or after `cancel` both observe it.
#[derive(Debug)]
pub struct CancelSource {
    tx: watch::Sender<bool>,
}

impl CancelSource {
    /// Create a new, uncancelled source.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Hand out a token that observes this source.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Signal cancellation to every token.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of a cancellation signal.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancellation is signalled. Never resolves if the
    /// source is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        let source_dropped = self.rx.wait_for(|cancelled| *cancelled).await.is_err();
        if source_dropped {
            std::future::pending::<()>().await;
        }
    }
}

/// Run `fut` unless `token` fires first, in which case `fut` is dropped.
pub async fn cancellable<T, F>(token: &CancelToken, fut: F) -> LedgerResult<T>
where
    F: Future<Output = LedgerResult<T>>,
{
    let mut token = token.clone();
    if token.is_cancelled() {
        return Err(LedgerError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = token.cancelled() => {
            tracing::debug!("Ledger operation cancelled");
            Err(LedgerError::Cancelled)
        }
        result = fut => result,
    }
}
