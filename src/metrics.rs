//! Prometheus metrics for relayer runs
//!
//! One invocation is short-lived, so there is no scrape endpoint;
//! metrics are encoded with the text format and written to a
//! node-exporter textfile when `METRICS_TEXTFILE` is configured.

#![allow(dead_code)]

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge_vec, CounterVec, Encoder, GaugeVec, TextEncoder,
};

lazy_static! {
    pub static ref LATEST_BLOCK: GaugeVec = register_gauge_vec!(
        "relayer_latest_block",
        "Latest block number observed on a chain",
        &["chain"]
    )
    .unwrap();

    pub static ref EVENTS_DETECTED: CounterVec = register_counter_vec!(
        "relayer_events_detected_total",
        "Bridge events detected in the scan window",
        &["chain", "event"]
    )
    .unwrap();

    pub static ref RELAYS_SUBMITTED: CounterVec = register_counter_vec!(
        "relayer_relays_submitted_total",
        "Relay transactions submitted",
        &["chain", "status"]
    )
    .unwrap();

    pub static ref ERRORS: CounterVec = register_counter_vec!(
        "relayer_errors_total",
        "Errors encountered during a run",
        &["chain", "type"]
    )
    .unwrap();
}

/// Record the observed chain head
pub fn record_latest_block(chain: &str, block_number: u64) {
    LATEST_BLOCK
        .with_label_values(&[chain])
        .set(block_number as f64);
}

/// Record detected events
pub fn record_events_detected(chain: &str, event: &str, count: usize) {
    EVENTS_DETECTED
        .with_label_values(&[chain, event])
        .inc_by(count as f64);
}

/// Record a relay submission outcome
pub fn record_relay(chain: &str, status: &str) {
    RELAYS_SUBMITTED.with_label_values(&[chain, status]).inc();
}

/// Record an error
pub fn record_error(chain: &str, error_type: &str) {
    ERRORS.with_label_values(&[chain, error_type]).inc();
}

/// Write the current metric families to a textfile for node-exporter
/// collection
pub fn write_textfile(path: &str) -> std::io::Result<()> {
    let encoder = TextEncoder::new();
    let families = prometheus::gather();
    let mut buf = Vec::new();
    encoder
        .encode(&families, &mut buf)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    std::fs::write(path, buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textfile_roundtrip() {
        record_latest_block("source", 1234);
        record_events_detected("source", "Deposit", 2);
        record_relay("destination", "submitted");
        record_error("source", "chain_unavailable");

        let dir = std::env::temp_dir().join("wrapbridge-metrics-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("relayer.prom");
        write_textfile(path.to_str().unwrap()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("relayer_latest_block"));
        assert!(contents.contains("relayer_events_detected_total"));
        assert!(contents.contains("relayer_relays_submitted_total"));
    }
}
