//! # Message Header
//!
//! Identity, correlation, timing and sync-intent metadata of an envelope.

use crate::identity::{Clock, IdGenerator, MessageId, Timestamp};
use serde::{Deserialize, Serialize};

/// Envelope header.
///
/// Wire fields: `msg_id`, `parent_msg_id` (omitted when empty), `timestamp`
/// and `sync` (omitted when false).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Unique id of this envelope instance.
    #[serde(rename = "msg_id")]
    id: MessageId,

    /// Id of the envelope this one replies to. Empty for a root message.
    /// Replies must be derived through `EnvelopeFactory` to keep this right.
    #[serde(
        rename = "parent_msg_id",
        default,
        skip_serializing_if = "MessageId::is_empty"
    )]
    parent_id: MessageId,

    /// Creation time in milliseconds since the epoch.
    timestamp: Timestamp,

    /// Set by a synchronous sender that blocks for a correlated reply.
    #[serde(default, skip_serializing_if = "is_false")]
    sync: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Header {
    /// Set all three identity fields explicitly. No format check is made on
    /// either id.
    pub fn build(
        id: impl Into<MessageId>,
        parent_id: impl Into<MessageId>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.into(),
            timestamp,
            sync: false,
        }
    }

    /// A header with a newly generated id, the given parent and the current
    /// time.
    pub fn fresh(
        parent_id: impl Into<MessageId>,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
    ) -> Self {
        Self::build(ids.generate(), parent_id, clock.now_millis())
    }

    /// Replace the id with a freshly generated one. Parent, timestamp and the
    /// sync flag are left alone.
    pub fn regenerate_id(&mut self, ids: &dyn IdGenerator) -> &mut Self {
        self.id = ids.generate();
        self
    }

    pub fn set_sync(&mut self, sync: bool) -> &mut Self {
        self.sync = sync;
        self
    }

    #[must_use]
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    #[must_use]
    pub fn parent_id(&self) -> &MessageId {
        &self.parent_id
    }

    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    #[must_use]
    pub fn is_sync(&self) -> bool {
        self.sync
    }

    /// True when the header has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_empty()
    }
}
