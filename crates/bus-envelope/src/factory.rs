//! # Envelope Factory
//!
//! Builds fresh envelopes and derives clones, responses and errors from a
//! received one. This is where the correlation protocol lives:
//!
//! | Derivation | `msg_id` | `parent_msg_id` | timestamp | route |
//! |------------|----------|-----------------|-----------|-------|
//! | clone | new | copied | copied | copied |
//! | response | new | `original.msg_id` | now | source/group/resource copied, operation `response` |
//! | error | new | see `ErrorCorrelation` | now | resource copied, operation `error` |
//!
//! A synchronous sender registers its request id and waits for an envelope
//! whose `parent_msg_id` matches, so these links must hold exactly.

use crate::config::{EnvelopeConfig, IdScheme};
use crate::envelope::Envelope;
use crate::errors::EnvelopeError;
use crate::header::Header;
use crate::identity::{
    Clock, IdGenerator, MessageId, SequentialIdGenerator, SystemClock, UuidGenerator,
};
use crate::route::{Operation, Route};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Which id an error reply carries as its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorCorrelation {
    /// `original.parent_msg_id`. This is what unmigrated peers emit, so an
    /// error correlates to the request the failing message itself answered.
    #[default]
    Parent,
    /// `original.msg_id`, the same link a response uses.
    Origin,
}

impl ErrorCorrelation {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Origin => "origin",
        }
    }
}

impl FromStr for ErrorCorrelation {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parent" => Ok(Self::Parent),
            "origin" => Ok(Self::Origin),
            _ => Err(EnvelopeError::InvalidConfig {
                key: "BUS_ERROR_CORRELATION",
                value: s.to_owned(),
            }),
        }
    }
}

/// Creates and derives envelopes with an injectable id generator and clock.
#[derive(Clone)]
pub struct EnvelopeFactory {
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    error_correlation: ErrorCorrelation,
}

impl fmt::Debug for EnvelopeFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvelopeFactory")
            .field("error_correlation", &self.error_correlation)
            .finish_non_exhaustive()
    }
}

impl Default for EnvelopeFactory {
    fn default() -> Self {
        Self::new(Arc::new(UuidGenerator), Arc::new(SystemClock))
    }
}

impl EnvelopeFactory {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            ids,
            clock,
            error_correlation: ErrorCorrelation::default(),
        }
    }

    /// Build a factory from configuration. The clock is always the system
    /// clock. Factories built with the same sequential prefix share one
    /// counter, so their ids never collide.
    #[must_use]
    pub fn from_config(config: &EnvelopeConfig) -> Self {
        let ids: Arc<dyn IdGenerator> = match &config.id_scheme {
            IdScheme::Uuid => Arc::new(UuidGenerator),
            IdScheme::Sequential { prefix } => SequentialIdGenerator::shared(prefix),
        };
        Self::new(ids, Arc::new(SystemClock)).with_error_correlation(config.error_correlation)
    }

    /// Process-wide factory behind the `Envelope` convenience methods.
    ///
    /// Built from `EnvelopeConfig::from_env()` on first use; later changes to
    /// the environment are not picked up.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<EnvelopeFactory> = OnceLock::new();
        GLOBAL.get_or_init(|| Self::from_config(&EnvelopeConfig::from_env()))
    }

    #[must_use]
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_error_correlation(mut self, policy: ErrorCorrelation) -> Self {
        self.error_correlation = policy;
        self
    }

    #[must_use]
    pub fn error_correlation(&self) -> ErrorCorrelation {
        self.error_correlation
    }

    /// A new id from this factory's generator.
    #[must_use]
    pub fn generate_id(&self) -> MessageId {
        self.ids.generate()
    }

    #[must_use]
    pub fn id_generator(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }

    /// Give `envelope` a new id from this factory's generator, keeping its
    /// parent, timestamp, route and content.
    pub fn regenerate_id<T>(&self, envelope: &mut Envelope<T>) {
        envelope.regenerate_id_with(self.ids.as_ref());
    }

    // =========================================================================
    // CONSTRUCTION
    // =========================================================================

    #[must_use]
    pub fn new_empty(&self) -> Envelope {
        Envelope::new_empty()
    }

    /// New id, the given parent, current time. Route is empty and content is
    /// `null` until the builders fill them in.
    pub fn new_envelope(&self, parent_id: impl Into<MessageId>) -> Envelope {
        let header = Header::fresh(parent_id, self.ids.as_ref(), self.clock.as_ref());
        Envelope::from_parts(header, Route::default(), Value::Null)
    }

    // =========================================================================
    // DERIVATION
    // =========================================================================

    /// Same message under a new id, for redelivery or fan-out to several
    /// destinations. Parent, timestamp, route and content are copied; the sync
    /// flag belongs to the original send and is not.
    pub fn clone_envelope<T: Clone>(&self, original: &Envelope<T>) -> Envelope<T> {
        let header = Header::build(
            self.ids.generate(),
            original.parent_id(),
            original.timestamp(),
        );
        let clone = Envelope::from_parts(
            header,
            original.route().clone(),
            original.content().clone(),
        );

        debug!(
            msg_id = %clone.id(),
            original_msg_id = %original.id(),
            parent_msg_id = %clone.parent_id(),
            "Cloned envelope"
        );
        clone
    }

    /// Reply carrying `content`, correlated to `original` by its id.
    pub fn new_response<T, U>(&self, original: &Envelope<T>, content: U) -> Envelope<U> {
        let response = self
            .new_envelope(original.id())
            .with_source(original.source(), original.group())
            .with_resource_operation(original.resource(), Operation::Response)
            .with_content(content);

        debug!(
            msg_id = %response.id(),
            parent_msg_id = %response.parent_id(),
            source = response.source(),
            group = response.group(),
            "Derived response envelope"
        );
        response
    }

    /// Failure reply whose content is `error_text`. Only the resource is
    /// copied from `original`; the parent follows this factory's
    /// `ErrorCorrelation`.
    pub fn new_error<T, U>(
        &self,
        original: &Envelope<T>,
        error_text: impl Into<String>,
    ) -> Envelope<U>
    where
        U: From<String>,
    {
        let parent_id = match self.error_correlation {
            ErrorCorrelation::Parent => original.parent_id(),
            ErrorCorrelation::Origin => original.id(),
        };
        let error_text = error_text.into();

        let error = self
            .new_envelope(parent_id)
            .with_resource_operation(original.resource(), Operation::Error);

        debug!(
            msg_id = %error.id(),
            parent_msg_id = %error.parent_id(),
            failed_msg_id = %original.id(),
            correlation = self.error_correlation.as_str(),
            error = %error_text,
            "Derived error envelope"
        );
        error.with_content(U::from(error_text))
    }
}
