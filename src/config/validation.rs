//! Configuration validation.
//!
//! Semantic checks only; serde handles syntax. Every problem is reported,
//! not just the first.

use std::fmt;
use url::Url;

use crate::config::schema::{ClientConfig, LedgerConfig};

/// Upper bound the ledger accepts for a status long-poll.
pub const MAX_WAIT_SECS: u64 = 300;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a full client configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = ledger_errors(&config.ledger);

    let confirmation = &config.confirmation;
    if confirmation.max_attempts == 0 {
        errors.push(ValidationError::new(
            "confirmation.max_attempts",
            "must be at least 1",
        ));
    }
    if confirmation.base_delay_ms > confirmation.max_delay_ms {
        errors.push(ValidationError::new(
            "confirmation.base_delay_ms",
            format!(
                "{} exceeds max_delay_ms {}",
                confirmation.base_delay_ms, confirmation.max_delay_ms
            ),
        ));
    }

    if config.signer.private_key_env.trim().is_empty() {
        errors.push(ValidationError::new(
            "signer.private_key_env",
            "must name an environment variable",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate just the ledger endpoint section.
pub fn validate_ledger(config: &LedgerConfig) -> Result<(), Vec<ValidationError>> {
    let errors = ledger_errors(config);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn ledger_errors(config: &LedgerConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    match Url::parse(&config.url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "ledger.url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "ledger.url",
            format!("'{}' is not a valid URL: {}", config.url, e),
        )),
    }

    if config.wait_secs > MAX_WAIT_SECS {
        errors.push(ValidationError::new(
            "ledger.wait_secs",
            format!("must not exceed {}", MAX_WAIT_SECS),
        ));
    }

    // Status long-polls add their wait on top of this, per request.
    if config.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "ledger.request_timeout_secs",
            "must be at least 1 second",
        ));
    }

    errors
}
