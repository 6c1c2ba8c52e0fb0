//! # Wire Codec
//!
//! JSON encoding of envelopes for transport between processes and modules.
//!
//! Field names are fixed for interoperability with peers that have not been
//! migrated:
//!
//! ```text
//! {
//!   "header":  { "msg_id", "parent_msg_id"?, "timestamp", "sync"? },
//!   "route"?:  { "source"?, "group"?, "operation"?, "resource"? },
//!   "content": <any>
//! }
//! ```
//!
//! Fields marked `?` are omitted when empty and decode to their empty value
//! when absent.

use crate::envelope::Envelope;
use crate::errors::EnvelopeError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Encode an envelope to JSON bytes.
pub fn encode<T: Serialize>(envelope: &Envelope<T>) -> Result<Vec<u8>, EnvelopeError> {
    serde_json::to_vec(envelope).map_err(EnvelopeError::Encode)
}

/// Encode an envelope to a JSON string.
pub fn encode_to_string<T: Serialize>(envelope: &Envelope<T>) -> Result<String, EnvelopeError> {
    serde_json::to_string(envelope).map_err(EnvelopeError::Encode)
}

/// Decode an envelope from JSON bytes.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<Envelope<T>, EnvelopeError> {
    serde_json::from_slice(bytes).map_err(EnvelopeError::Decode)
}

/// Decode an envelope from a JSON string.
pub fn decode_str<T: DeserializeOwned>(text: &str) -> Result<Envelope<T>, EnvelopeError> {
    serde_json::from_str(text).map_err(EnvelopeError::Decode)
}

impl<T: Serialize> Envelope<T> {
    /// Read the content as a concrete payload type.
    pub fn decode_content<U: DeserializeOwned>(&self) -> Result<U, EnvelopeError> {
        let value = serde_json::to_value(self.content()).map_err(EnvelopeError::Content)?;
        serde_json::from_value(value).map_err(EnvelopeError::Content)
    }

    /// Erase the payload type so the bus can carry it.
    pub fn into_untyped(self) -> Result<Envelope, EnvelopeError> {
        let (header, route, content) = self.into_parts();
        let content = serde_json::to_value(content).map_err(EnvelopeError::Content)?;
        Ok(Envelope::from_parts(header, route, content))
    }
}

impl Envelope<Value> {
    /// Consume the envelope and read its content as a concrete payload type.
    pub fn into_typed<U: DeserializeOwned>(self) -> Result<Envelope<U>, EnvelopeError> {
        let (header, route, content) = self.into_parts();
        let content = serde_json::from_value(content).map_err(EnvelopeError::Content)?;
        Ok(Envelope::from_parts(header, route, content))
    }
}
