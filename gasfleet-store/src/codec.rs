// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record bodies are stored in Concise Binary Object Representation ([CBOR]).
//!
//! [CBOR]: https://cbor.io/
use thiserror::Error;

use crate::records::{Record, RecordId};

/// Serializes the body of a record. The id is not part of the body.
pub fn encode_record<R: Record>(record: &R) -> Result<Vec<u8>, CodecError> {
    let mut bytes = Vec::new();
    ciborium::ser::into_writer(record, &mut bytes)
        .map_err(|err| CodecError::Encode(R::COLLECTION.as_str(), err.to_string()))?;
    Ok(bytes)
}

/// Deserializes the body of a record and attaches the id it is stored under.
pub fn decode_record<R: Record>(id: RecordId, bytes: &[u8]) -> Result<R, CodecError> {
    let mut record: R = ciborium::from_reader(bytes)
        .map_err(|err| CodecError::Decode(R::COLLECTION.as_str(), err.to_string()))?;
    record.set_id(id);
    Ok(record)
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed encoding '{0}' record before storing it: {1}")]
    Encode(&'static str, String),

    /// Invalid, corrupted data was found in the store. This is a critical error.
    #[error("could not decode corrupted '{0}' record: {1}")]
    Decode(&'static str, String),
}
