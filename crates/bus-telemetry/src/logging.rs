//! Structured logging setup.
//!
//! Library crates only emit `tracing` events. A binary or test harness calls
//! `init_logging` once to install the subscriber that formats them, either as
//! JSON lines (containers, log shippers) or human-readable text.

use crate::{TelemetryConfig, TelemetryError};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber described by `config`.
///
/// Fails with `SubscriberInit` if a global subscriber is already set.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(format!("log level {:?}: {}", config.log_level, e)))?;

    // JSON output for containers/production
    let json_layer = (config.console_output && config.json_logs).then(|| {
        fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
    });

    // Pretty output for development
    let pretty_layer = (config.console_output && !config.json_logs).then(|| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Structured logging initialized"
    );

    Ok(())
}

/// Log an envelope-related event with the standard correlation fields.
///
/// ```rust,ignore
/// log_envelope_event!(debug, "edgehub", "Dispatching envelope", msg.id(), msg.parent_id(), group = msg.group());
/// ```
#[macro_export]
macro_rules! log_envelope_event {
    ($level:ident, $module:expr, $msg:expr, $msg_id:expr, $parent_msg_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            module = $module,
            msg_id = %$msg_id,
            parent_msg_id = %$parent_msg_id,
            $($($field)*,)?
            $msg
        )
    };
}
