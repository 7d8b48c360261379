//! Protobuf wire messages accepted by the ledger's submission endpoint.
//!
//! Field numbers must match the validator's schema exactly; signatures are
//! computed over the encoded header bytes, so any drift here produces
//! batches the ledger rejects.

use prost::Message;

#[derive(Clone, PartialEq, Message)]
pub struct TransactionHeader {
    #[prost(string, tag = "1")]
    pub batcher_public_key: String,
    #[prost(string, repeated, tag = "2")]
    pub dependencies: Vec<String>,
    #[prost(string, tag = "3")]
    pub family_name: String,
    #[prost(string, tag = "4")]
    pub family_version: String,
    #[prost(string, repeated, tag = "5")]
    pub inputs: Vec<String>,
    #[prost(string, tag = "6")]
    pub nonce: String,
    #[prost(string, repeated, tag = "7")]
    pub outputs: Vec<String>,
    #[prost(string, tag = "9")]
    pub payload_sha512: String,
    #[prost(string, tag = "10")]
    pub signer_public_key: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct Transaction {
    #[prost(bytes = "vec", tag = "1")]
    pub header: Vec<u8>,
    /// Signature over `header`; also serves as the transaction id.
    #[prost(string, tag = "2")]
    pub header_signature: String,
    #[prost(bytes = "vec", tag = "3")]
    pub payload: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct BatchHeader {
    #[prost(string, tag = "1")]
    pub signer_public_key: String,
    #[prost(string, repeated, tag = "2")]
    pub transaction_ids: Vec<String>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Batch {
    #[prost(bytes = "vec", tag = "1")]
    pub header: Vec<u8>,
    #[prost(string, tag = "2")]
    pub header_signature: String,
    #[prost(message, repeated, tag = "3")]
    pub transactions: Vec<Transaction>,
    #[prost(bool, tag = "4")]
    pub trace: bool,
}

/// Submission container: the body of `POST /batches`.
#[derive(Clone, PartialEq, Message)]
pub struct BatchList {
    #[prost(message, repeated, tag = "1")]
    pub batches: Vec<Batch>,
}

impl Transaction {
    /// Transaction id as referenced from batch headers.
    pub fn id(&self) -> &str {
        &self.header_signature
    }

    /// Decode the signed header.
    pub fn decode_header(&self) -> Result<TransactionHeader, prost::DecodeError> {
        TransactionHeader::decode(self.header.as_slice())
    }
}

impl Batch {
    /// Batch id, also the tracking id the ledger hands back.
    pub fn id(&self) -> &str {
        &self.header_signature
    }

    /// Decode the signed header.
    pub fn decode_header(&self) -> Result<BatchHeader, prost::DecodeError> {
        BatchHeader::decode(self.header.as_slice())
    }
}

impl BatchList {
    /// Serialize for the submission endpoint.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode_to_vec()
    }
}
