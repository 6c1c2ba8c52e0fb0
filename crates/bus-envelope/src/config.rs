//! Envelope factory configuration from environment variables.

use crate::errors::EnvelopeError;
use crate::factory::ErrorCorrelation;
use std::env;
use std::str::FromStr;
use tracing::warn;

/// Default prefix for `sequential` ids when none is given.
pub const DEFAULT_SEQUENTIAL_PREFIX: &str = "msg";

/// How message ids are generated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IdScheme {
    /// Random UUID v4.
    #[default]
    Uuid,
    /// `<prefix>-<n>` from one process-wide counter per prefix. Counters
    /// restart with the process and other processes may issue the same ids,
    /// so this is meant for tests and single-process setups.
    Sequential { prefix: String },
}

impl FromStr for IdScheme {
    type Err = EnvelopeError;

    /// Accepts `uuid`, `sequential` or `sequential:<prefix>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (scheme, prefix) = match trimmed.split_once(':') {
            Some((scheme, prefix)) => (scheme, Some(prefix)),
            None => (trimmed, None),
        };

        match (scheme.to_ascii_lowercase().as_str(), prefix) {
            ("uuid", None) => Ok(Self::Uuid),
            ("sequential", None) => Ok(Self::Sequential {
                prefix: DEFAULT_SEQUENTIAL_PREFIX.to_string(),
            }),
            ("sequential", Some(prefix)) if !prefix.is_empty() => Ok(Self::Sequential {
                prefix: prefix.to_string(),
            }),
            _ => Err(EnvelopeError::InvalidConfig {
                key: "BUS_ID_SCHEME",
                value: s.to_owned(),
            }),
        }
    }
}

/// Configuration for an `EnvelopeFactory`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvelopeConfig {
    /// Parent id used by error replies.
    pub error_correlation: ErrorCorrelation,

    /// Id generation scheme.
    pub id_scheme: IdScheme,
}

impl EnvelopeConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BUS_ERROR_CORRELATION`: `parent` or `origin` (default: parent)
    /// - `BUS_ID_SCHEME`: `uuid`, `sequential` or `sequential:<prefix>`
    ///   (default: uuid)
    ///
    /// Values that do not parse are logged and replaced by the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            error_correlation: parse_or_default(&lookup, "BUS_ERROR_CORRELATION"),
            id_scheme: parse_or_default(&lookup, "BUS_ID_SCHEME"),
        }
    }
}

fn parse_or_default<T, F>(lookup: &F, key: &str) -> T
where
    T: FromStr<Err = EnvelopeError> + Default,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.parse().unwrap_or_else(|e: EnvelopeError| {
            warn!(key, value = %raw, error = %e, "Ignoring invalid configuration value");
            T::default()
        }),
        None => T::default(),
    }
}
