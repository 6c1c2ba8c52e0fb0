//! Cross-module integration tests for the envelope core.

pub mod concurrency;
pub mod flows;

/// Install a quiet subscriber once so `debug!` events from derivations are
/// exercised. Later calls are ignored.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let config = bus_telemetry::TelemetryConfig {
        log_level: "bus_envelope=debug".to_string(),
        console_output: false,
        ..bus_telemetry::TelemetryConfig::default()
    };
    if let Ok(guard) = bus_telemetry::init_telemetry(config) {
        // Keep logging alive for the rest of the test process.
        std::mem::forget(guard);
    }
}
