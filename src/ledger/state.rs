//! Decoding of entity state records.
//!
//! Each state entry holds base64 text of five comma-separated fields.
//! Anything else is a decode error; a record is never partially filled.

use base64::Engine;

use crate::ledger::address;
use crate::ledger::client::{LedgerClient, StateEntry};
use crate::ledger::types::{EntityRecord, LedgerError, LedgerResult};

/// Decode one base64 state payload into a record.
pub fn decode_record(data: &str) -> LedgerResult<EntityRecord> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| LedgerError::Decode(format!("Invalid base64 state data: {}", e)))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| LedgerError::Decode(format!("State data is not UTF-8: {}", e)))?;

    let fields: Vec<&str> = text.split(',').collect();
    let [name, owner, total_space, taken_space, state] = fields.as_slice() else {
        return Err(LedgerError::Decode(format!(
            "State record has {} fields, expected {}",
            fields.len(),
            EntityRecord::FIELD_COUNT
        )));
    };

    Ok(EntityRecord {
        name: name.to_string(),
        owner: owner.to_string(),
        total_space: total_space.to_string(),
        taken_space: taken_space.to_string(),
        state: state.to_string(),
    })
}

/// Encode a record the way the ledger stores it.
pub fn encode_record(record: &EntityRecord) -> LedgerResult<String> {
    let fields = record.fields();
    if let Some(bad) = fields.iter().find(|f| f.contains(',')) {
        return Err(LedgerError::Validation(format!(
            "Record field '{}' contains ','",
            bad
        )));
    }
    Ok(base64::engine::general_purpose::STANDARD.encode(fields.join(",")))
}

fn decode_entry(entry: &StateEntry) -> LedgerResult<EntityRecord> {
    decode_record(&entry.data).map_err(|e| match e {
        LedgerError::Decode(msg) => LedgerError::Decode(format!("{}: {}", entry.address, msg)),
        other => other,
    })
}

/// Reads and decodes entity state. Ordering of results is left to callers.
#[derive(Debug, Clone)]
pub struct StateReader {
    client: LedgerClient,
}

impl StateReader {
    pub fn new(client: LedgerClient) -> Self {
        Self { client }
    }

    /// Decode every entry stored under `namespace_prefix`.
    pub async fn list_entities(&self, namespace_prefix: &str) -> LedgerResult<Vec<EntityRecord>> {
        let entries = match self.client.fetch_state(namespace_prefix).await {
            Ok(entries) => entries,
            Err(LedgerError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e),
        };
        entries.iter().map(decode_entry).collect()
    }

    /// Decode every entity in the Hylesaga namespace.
    pub async fn list_family(&self) -> LedgerResult<Vec<EntityRecord>> {
        self.list_entities(&address::namespace_prefix()).await
    }

    /// Decode the single entry stored at `address`.
    pub async fn get_entity(&self, address: &str) -> LedgerResult<EntityRecord> {
        let entries = self.client.fetch_state(address).await?;
        let entry = entries
            .iter()
            .find(|e| e.address == address)
            .ok_or_else(|| LedgerError::NotFound(address.to_string()))?;
        decode_entry(entry)
    }

    /// Decode the entity called `name`.
    pub async fn get_entity_by_name(&self, name: &str) -> LedgerResult<EntityRecord> {
        self.get_entity(&address::address(name)).await
    }
}
