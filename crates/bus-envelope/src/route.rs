//! # Message Route
//!
//! Addressing (`source`, `group`) and intent (`operation`, `resource`) of an
//! envelope. The dispatch engine reads these fields; it never looks at the
//! content.
//!
//! ## Unknown Operations
//!
//! Operations outside the fixed vocabulary are carried as
//! `Operation::Unknown` instead of being rejected. Newer peers may introduce
//! operations older ones do not know, and the envelope layer passes them
//! through untouched. Dispatch may not handle them, and the derivation helpers
//! never produce them. Callers that want to reject them at the boundary use
//! `Operation::parse_strict`.

use crate::errors::EnvelopeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Well-known resource categories. The resource field is free-form; these are
/// the values the domain modules agree on.
pub mod resource {
    pub const POD: &str = "pod";
    pub const CONFIGMAP: &str = "configmap";
    pub const SECRET: &str = "secret";
    pub const NODE: &str = "node";
    pub const PODLIST: &str = "podlist";
    pub const POD_STATUS: &str = "podstatus";
    pub const NODE_STATUS: &str = "nodestatus";
}

/// Intent of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    Insert,
    Delete,
    Query,
    Update,
    /// Reply to a request, derived with `EnvelopeFactory::new_response`.
    Response,
    /// Failure reply, derived with `EnvelopeFactory::new_error`.
    Error,
    /// An operation this build does not recognise.
    Unknown(String),
}

impl Operation {
    /// Wire text of the operation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Query => "query",
            Self::Update => "update",
            Self::Response => "response",
            Self::Error => "error",
            Self::Unknown(other) => other,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Parse wire text, rejecting anything outside the fixed vocabulary.
    pub fn parse_strict(text: &str) -> Result<Self, EnvelopeError> {
        match Self::from(text) {
            Self::Unknown(other) => Err(EnvelopeError::UnknownOperation(other)),
            known => Ok(known),
        }
    }
}

impl From<&str> for Operation {
    fn from(text: &str) -> Self {
        match text {
            "insert" => Self::Insert,
            "delete" => Self::Delete,
            "query" => Self::Query,
            "update" => Self::Update,
            "response" => Self::Response,
            "error" => Self::Error,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

impl From<String> for Operation {
    fn from(text: String) -> Self {
        match Self::from(text.as_str()) {
            Self::Unknown(_) => Self::Unknown(text),
            known => known,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for Operation {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Operation {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// Empty text and `null` both mean "no operation".
fn deserialize_operation<'de, D>(deserializer: D) -> Result<Option<Operation>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    Ok(text.filter(|t| !t.is_empty()).map(Operation::from))
}

/// Envelope route. Every wire field is omitted when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Module the message comes from.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    source: String,

    /// Subscriber group the message is broadcast to.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    group: String,

    /// What to do with the resource.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_operation"
    )]
    operation: Option<Operation>,

    /// Which resource to operate on.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    resource: String,
}

impl Route {
    /// Full route in one call.
    pub fn new(
        source: impl Into<String>,
        group: impl Into<String>,
        resource: impl Into<String>,
        operation: impl Into<Operation>,
    ) -> Self {
        let mut route = Self::default();
        route
            .set_route(source, group)
            .set_resource_operation(resource, operation);
        route
    }

    /// Set origin module and destination group.
    pub fn set_route(&mut self, source: impl Into<String>, group: impl Into<String>) -> &mut Self {
        self.source = source.into();
        self.group = group.into();
        self
    }

    /// Set the operation and the resource it targets. Empty operation text
    /// means "no operation", as it does on the wire.
    pub fn set_resource_operation(
        &mut self,
        resource: impl Into<String>,
        operation: impl Into<Operation>,
    ) -> &mut Self {
        let operation = operation.into();
        self.resource = resource.into();
        self.operation = (!operation.as_str().is_empty()).then_some(operation);
        self
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    #[must_use]
    pub fn operation(&self) -> Option<&Operation> {
        self.operation.as_ref()
    }

    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// True when no field is set; the whole route is then left off the wire.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
            && self.group.is_empty()
            && self.operation.is_none()
            && self.resource.is_empty()
    }
}
