//! Payload encoding and signed transaction construction.
//!
//! # Responsibilities
//! - Validate and encode the `name,action,argument` payload
//! - Derive the entity address and declare it as the sole input/output
//! - Build a header with a fresh nonce and sign it

use prost::Message;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::ledger::address::{self, FAMILY_NAME, FAMILY_VERSION};
use crate::ledger::protocol::{Transaction, TransactionHeader};
use crate::ledger::signer::Signer;
use crate::ledger::types::{LedgerError, LedgerResult};

/// Field separator inside a payload.
pub const DELIMITER: char = ',';

/// Actions understood by the Hylesaga family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Create a new entity. Takes no argument.
    Create,
    /// Take space from an entity. The argument is the amount.
    Take,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Take => "take",
        }
    }

    fn requires_argument(&self) -> bool {
        matches!(self, Action::Take)
    }
}

impl FromStr for Action {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Action::Create),
            "take" => Ok(Action::Take),
            other => Err(LedgerError::Validation(format!("Unknown action '{}'", other))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated transaction payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub name: String,
    pub action: Action,
    pub argument: Option<String>,
}

impl Payload {
    /// Validate inputs against the payload format.
    pub fn new(name: &str, action: Action, argument: Option<&str>) -> LedgerResult<Self> {
        if name.is_empty() {
            return Err(LedgerError::Validation("Entity name must not be empty".into()));
        }
        check_field("entity name", name)?;

        match (action.requires_argument(), argument) {
            (true, None) => {
                return Err(LedgerError::Validation(format!(
                    "Action '{}' requires an argument",
                    action
                )))
            }
            (false, Some(_)) => {
                return Err(LedgerError::Validation(format!(
                    "Action '{}' does not take an argument",
                    action
                )))
            }
            (true, Some(arg)) => check_field("argument", arg)?,
            (false, None) => {}
        }

        Ok(Self {
            name: name.to_string(),
            action,
            argument: argument.map(str::to_string),
        })
    }

    /// Comma-joined wire form. An absent argument is an empty trailing field.
    pub fn encode(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.name,
            DELIMITER,
            self.action,
            DELIMITER,
            self.argument.as_deref().unwrap_or("")
        )
    }

    /// Parse the wire form back into a payload.
    pub fn decode(raw: &str) -> LedgerResult<Self> {
        let fields: Vec<&str> = raw.split(DELIMITER).collect();
        if fields.len() != 3 {
            return Err(LedgerError::Decode(format!(
                "Payload has {} fields, expected 3",
                fields.len()
            )));
        }
        let action: Action = fields[1].parse()?;
        let argument = Some(fields[2]).filter(|a| !a.is_empty());
        Self::new(fields[0], action, argument)
    }
}

fn check_field(label: &str, value: &str) -> LedgerResult<()> {
    if value.contains(DELIMITER) {
        return Err(LedgerError::Validation(format!(
            "{} must not contain '{}'",
            label, DELIMITER
        )));
    }
    Ok(())
}

/// Builds signed transactions for one signing key.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    signer: Signer,
    batcher_public_key: String,
}

impl TransactionBuilder {
    /// Builder whose transactions are batched by the same key that signs them.
    pub fn new(signer: Signer) -> Self {
        let batcher_public_key = signer.public_key().to_string();
        Self {
            signer,
            batcher_public_key,
        }
    }

    /// Declare a different batcher key.
    pub fn with_batcher(mut self, batcher_public_key: impl Into<String>) -> Self {
        self.batcher_public_key = batcher_public_key.into();
        self
    }

    /// Build and sign a transaction for `action` on the entity `name`.
    pub fn build(
        &self,
        name: &str,
        action: Action,
        argument: Option<&str>,
    ) -> LedgerResult<Transaction> {
        let payload = Payload::new(name, action, argument)?;
        self.build_payload(&payload)
    }

    /// Build and sign a transaction for an already validated payload.
    pub fn build_payload(&self, payload: &Payload) -> LedgerResult<Transaction> {
        let encoded = payload.encode();
        let entity_address = address::address(&payload.name);

        let header = TransactionHeader {
            batcher_public_key: self.batcher_public_key.clone(),
            dependencies: Vec::new(),
            family_name: FAMILY_NAME.to_string(),
            family_version: FAMILY_VERSION.to_string(),
            inputs: vec![entity_address.clone()],
            nonce: Uuid::new_v4().to_string(),
            outputs: vec![entity_address],
            payload_sha512: address::sha512_hex(encoded.as_bytes()),
            signer_public_key: self.signer.public_key().to_string(),
        };

        let header_bytes = header.encode_to_vec();
        let header_signature = self.signer.sign(&header_bytes)?;

        tracing::debug!(
            entity = %payload.name,
            action = %payload.action,
            transaction_id = %header_signature,
            "Transaction signed"
        );

        Ok(Transaction {
            header: header_bytes,
            header_signature,
            payload: encoded.into_bytes(),
        })
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }
}
