//! # Envelope
//!
//! The universal wrapper for all bus communication: one `Header`, one `Route`
//! and an opaque content value.
//!
//! ## Construction
//!
//! ```rust
//! use bus_envelope::{resource, Envelope, Operation};
//! use serde_json::json;
//!
//! let msg: Envelope = Envelope::new("")
//!     .with_route("edgehub", "edged", resource::POD, Operation::Insert)
//!     .with_content(json!({ "name": "pod-1" }));
//! assert_eq!(msg.source(), "edgehub");
//! ```
//!
//! The `with_*` builders consume and return the same envelope, so a chain
//! never copies. A half-built envelope is owned by exactly one caller; share
//! it only once construction is finished, and clone it before giving
//! independent routing to several consumers.

use crate::factory::EnvelopeFactory;
use crate::header::Header;
use crate::identity::{IdGenerator, MessageId, Timestamp};
use crate::route::{Operation, Route};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A bus message.
///
/// Wire fields: `header`, `route` (omitted when empty) and `content` (always
/// present). `T` is the payload type; the default is an untyped JSON value,
/// which is what the bus itself handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    header: Header,

    #[serde(default, skip_serializing_if = "Route::is_empty")]
    route: Route,

    content: T,
}

impl Envelope<Value> {
    /// Zero header, empty route, `null` content. A starting point for
    /// composing a message by hand with `with_header`.
    #[must_use]
    pub fn new_empty() -> Self {
        Self::from_parts(Header::default(), Route::default(), Value::Null)
    }

    /// A fresh envelope from the default factory: new id, the given parent,
    /// current time. Route and content are left to the builders.
    pub fn new(parent_id: impl Into<MessageId>) -> Self {
        EnvelopeFactory::global().new_envelope(parent_id)
    }
}

impl<T> Envelope<T> {
    pub fn from_parts(header: Header, route: Route, content: T) -> Self {
        Self {
            header,
            route,
            content,
        }
    }

    // =========================================================================
    // BUILDERS
    // =========================================================================

    /// Replace the header. Also used to rebuild a header during derivation.
    #[must_use]
    pub fn with_header(mut self, header: Header) -> Self {
        self.header = header;
        self
    }

    /// Set source, group, resource and operation at once.
    #[must_use]
    pub fn with_route(
        mut self,
        source: impl Into<String>,
        group: impl Into<String>,
        resource: impl Into<String>,
        operation: impl Into<Operation>,
    ) -> Self {
        self.set_route(source, group, resource, operation);
        self
    }

    /// Set only the addressing.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>, group: impl Into<String>) -> Self {
        self.set_source(source, group);
        self
    }

    /// Set only the intent.
    #[must_use]
    pub fn with_resource_operation(
        mut self,
        resource: impl Into<String>,
        operation: impl Into<Operation>,
    ) -> Self {
        self.set_resource_operation(resource, operation);
        self
    }

    /// Attach the payload, dropping any previous content.
    #[must_use]
    pub fn with_content<U>(self, content: U) -> Envelope<U> {
        Envelope {
            header: self.header,
            route: self.route,
            content,
        }
    }

    #[must_use]
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.set_sync(sync);
        self
    }

    // =========================================================================
    // IN-PLACE SETTERS
    // =========================================================================

    pub fn set_header(&mut self, header: Header) -> &mut Self {
        self.header = header;
        self
    }

    pub fn set_route(
        &mut self,
        source: impl Into<String>,
        group: impl Into<String>,
        resource: impl Into<String>,
        operation: impl Into<Operation>,
    ) -> &mut Self {
        self.route
            .set_route(source, group)
            .set_resource_operation(resource, operation);
        self
    }

    pub fn set_source(&mut self, source: impl Into<String>, group: impl Into<String>) -> &mut Self {
        self.route.set_route(source, group);
        self
    }

    pub fn set_resource_operation(
        &mut self,
        resource: impl Into<String>,
        operation: impl Into<Operation>,
    ) -> &mut Self {
        self.route.set_resource_operation(resource, operation);
        self
    }

    pub fn set_content(&mut self, content: T) -> &mut Self {
        self.content = content;
        self
    }

    /// Mark the message as sent by a caller blocking for the reply.
    pub fn set_sync(&mut self, sync: bool) -> &mut Self {
        self.header.set_sync(sync);
        self
    }

    /// Give the envelope a new id from the default factory's generator,
    /// keeping its lineage.
    pub fn regenerate_id(&mut self) -> &mut Self {
        self.regenerate_id_with(EnvelopeFactory::global().id_generator())
    }

    pub fn regenerate_id_with(&mut self, ids: &dyn IdGenerator) -> &mut Self {
        self.header.regenerate_id(ids);
        self
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn id(&self) -> &MessageId {
        self.header.id()
    }

    #[must_use]
    pub fn parent_id(&self) -> &MessageId {
        self.header.parent_id()
    }

    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.header.timestamp()
    }

    /// The sync flag is only meaningful to a synchronous sender waiting for
    /// the reply.
    #[must_use]
    pub fn is_sync(&self) -> bool {
        self.header.is_sync()
    }

    #[must_use]
    pub fn source(&self) -> &str {
        self.route.source()
    }

    #[must_use]
    pub fn group(&self) -> &str {
        self.route.group()
    }

    #[must_use]
    pub fn resource(&self) -> &str {
        self.route.resource()
    }

    #[must_use]
    pub fn operation(&self) -> Option<&Operation> {
        self.route.operation()
    }

    #[must_use]
    pub fn content(&self) -> &T {
        &self.content
    }

    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn into_content(self) -> T {
        self.content
    }

    pub fn into_parts(self) -> (Header, Route, T) {
        (self.header, self.route, self.content)
    }

    // =========================================================================
    // CORRELATION
    // =========================================================================

    /// True when this envelope's parent is `other`.
    #[must_use]
    pub fn is_reply_to<U>(&self, other: &Envelope<U>) -> bool {
        !self.parent_id().is_empty() && self.parent_id() == other.id()
    }

    #[must_use]
    pub fn is_response(&self) -> bool {
        self.operation() == Some(&Operation::Response)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.operation() == Some(&Operation::Error)
    }

    /// Reply to this envelope through the default factory.
    pub fn response<U>(&self, content: U) -> Envelope<U> {
        EnvelopeFactory::global().new_response(self, content)
    }

    /// Error reply to this envelope through the default factory.
    pub fn error<U: From<String>>(&self, error_text: impl Into<String>) -> Envelope<U> {
        EnvelopeFactory::global().new_error(self, error_text)
    }
}

impl<T: Clone> Envelope<T> {
    /// Copy of this envelope under a new id, through the default factory.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        EnvelopeFactory::global().clone_envelope(self)
    }
}
