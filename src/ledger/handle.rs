//! Process-wide ledger client with atomic endpoint replacement.
//!
//! Operations take a snapshot of the current client when they start and
//! use it to completion, so a concurrent `reconfigure` never redirects a
//! request that is already in flight.

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::config::validation::validate_ledger;
use crate::ledger::client::LedgerClient;
use crate::ledger::state::StateReader;
use crate::ledger::types::{LedgerConfig, LedgerError, LedgerResult};

/// Shared, swappable ledger client.
#[derive(Debug)]
pub struct LedgerHandle {
    current: ArcSwap<LedgerClient>,
}

impl LedgerHandle {
    pub fn new(client: LedgerClient) -> Self {
        Self {
            current: ArcSwap::from_pointee(client),
        }
    }

    /// Validate `config` and build the initial client.
    pub fn from_config(config: LedgerConfig) -> LedgerResult<Self> {
        check(&config)?;
        Ok(Self::new(LedgerClient::new(config)?))
    }

    /// Snapshot of the client new operations should use.
    pub fn client(&self) -> Arc<LedgerClient> {
        self.current.load_full()
    }

    /// State reader bound to the current client.
    pub fn state_reader(&self) -> StateReader {
        StateReader::new(LedgerClient::clone(&self.client()))
    }

    /// Replace the client if `config` differs from the current one.
    ///
    /// Returns whether a swap happened. On error the current client stays.
    pub fn reconfigure(&self, config: LedgerConfig) -> LedgerResult<bool> {
        if self.current.load().config() == &config {
            return Ok(false);
        }
        check(&config)?;

        let client = LedgerClient::new(config)?;
        let previous = self.current.swap(Arc::new(client));
        tracing::info!(
            previous = %previous.url(),
            current = %self.current.load().url(),
            "Ledger endpoint reconfigured"
        );
        Ok(true)
    }
}

fn check(config: &LedgerConfig) -> LedgerResult<()> {
    validate_ledger(config).map_err(|errors| {
        let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
        LedgerError::Validation(joined.join(", "))
    })
}
