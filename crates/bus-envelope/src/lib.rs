//! # Bus Envelope Crate
//!
//! The uniform wrapper for every command, query, response and error that
//! travels between bus modules.
//!
//! ## Design Principles
//!
//! - **Opaque Payload**: The bus routes on `Header` and `Route` only; the
//!   `content` is never inspected.
//! - **Correlation by Id**: A reply carries the id of the message it answers in
//!   its `parent_msg_id`. Synchronous senders match replies on that field.
//! - **No Field Reaching**: Envelope fields are private; all mutation goes
//!   through builder methods or the `EnvelopeFactory`.
//!
//! ## Usage
//!
//! ```rust
//! use bus_envelope::{resource, Envelope, EnvelopeFactory, Operation};
//! use serde_json::json;
//!
//! let factory = EnvelopeFactory::default();
//! let request: Envelope = factory
//!     .new_envelope("")
//!     .with_route("edgehub", "edged", resource::POD, Operation::Insert)
//!     .with_content(json!({ "name": "pod-1" }));
//!
//! let reply = factory.new_response(&request, json!({ "status": "ok" }));
//! assert!(reply.is_reply_to(&request));
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod codec;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod factory;
pub mod header;
pub mod identity;
pub mod route;

pub use codec::{decode, decode_str, encode, encode_to_string};
pub use config::{EnvelopeConfig, IdScheme};
pub use envelope::Envelope;
pub use errors::EnvelopeError;
pub use factory::{EnvelopeFactory, ErrorCorrelation};
pub use header::Header;
pub use identity::{
    generate_id, now_millis, Clock, IdGenerator, ManualClock, MessageId, SequentialIdGenerator,
    SystemClock, Timestamp, UuidGenerator,
};
pub use route::{resource, Operation, Route};
