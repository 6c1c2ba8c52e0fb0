//! # Error Types
//!
//! Errors from the envelope codec, strict operation parsing and configuration.
//! Building and deriving envelopes never fails; a failed request travels as an
//! ordinary envelope whose operation is `error`.

use thiserror::Error;

/// Errors that can occur when handling envelopes at a boundary.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The envelope could not be written to its wire form.
    #[error("Failed to encode envelope: {0}")]
    Encode(#[source] serde_json::Error),

    /// The bytes were not a well-formed envelope.
    #[error("Failed to decode envelope: {0}")]
    Decode(#[source] serde_json::Error),

    /// The content did not match the payload type the receiver asked for.
    #[error("Content does not match the expected payload type: {0}")]
    Content(#[source] serde_json::Error),

    /// Operation text outside the fixed vocabulary.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// A configuration value could not be parsed.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidConfig { key: &'static str, value: String },
}
