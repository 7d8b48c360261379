//! Deterministic ledger addressing for the Hylesaga family.
//!
//! An address is 70 lowercase hex characters: the 6-character family
//! namespace followed by the first 64 characters of the entity name's
//! SHA-512 digest.

use sha2::{Digest, Sha512};

/// Transaction family name.
pub const FAMILY_NAME: &str = "Hylesaga";

/// Transaction family version.
pub const FAMILY_VERSION: &str = "1.0";

/// Length of the namespace prefix in hex characters.
pub const PREFIX_LEN: usize = 6;

/// Length of a full address in hex characters.
pub const ADDRESS_LEN: usize = 70;

/// Lowercase hex SHA-512 of `input`.
pub fn sha512_hex(input: &[u8]) -> String {
    hex::encode(Sha512::digest(input))
}

/// Namespace prefix owned by the family.
pub fn namespace_prefix() -> String {
    let mut digest = sha512_hex(FAMILY_NAME.as_bytes());
    digest.truncate(PREFIX_LEN);
    digest
}

/// Address of the entity called `name`.
pub fn address(name: &str) -> String {
    let mut addr = namespace_prefix();
    addr.push_str(&sha512_hex(name.as_bytes())[..ADDRESS_LEN - PREFIX_LEN]);
    addr
}

/// Whether `candidate` is shaped like an address in this family.
pub fn is_family_address(candidate: &str) -> bool {
    candidate.len() == ADDRESS_LEN
        && candidate.starts_with(&namespace_prefix())
        && candidate
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
