//! Relayer loop
//!
//! One invocation processes exactly one direction: scan a window on the
//! watched chain, decode the matching events, build the mirrored calls,
//! and submit them in source-event order on the execution chain, then
//! report a summary. There is no cross-run cursor; every run re-derives
//! its window from "latest minus lookback", so a long-lived deployment
//! is driven by an external scheduler (cron) rather than looping here.
//! Consequently relay is at-least-once: duplicate suppression is the
//! destination contract's job or a durable dedup ledger's, not this
//! process's.

use std::fmt;

use alloy::signers::local::PrivateKeySigner;
use tracing::{error, info, warn};

use crate::builder::build_relay_call;
use crate::chain::ChainClient;
use crate::config::Config;
use crate::decoder::decode_log;
use crate::error::RelayError;
use crate::metrics;
use crate::submitter::{Dispatcher, SubmitOutcome, Submitter};
use crate::types::{Direction, ScanWindow};

/// Counts reported once at the end of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySummary {
    pub direction: Direction,
    pub window: ScanWindow,
    pub events_found: usize,
    pub relayed: usize,
    pub unconfirmed: usize,
    pub failed: usize,
    pub malformed: usize,
}

impl RelaySummary {
    /// True when every detected event was relayed cleanly
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.malformed == 0
    }
}

impl fmt::Display for RelaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "watched {} blocks {}: {} event(s) found, {} relayed, {} unconfirmed, {} failed, {} malformed",
            self.direction,
            self.window,
            self.events_found,
            self.relayed,
            self.unconfirmed,
            self.failed,
            self.malformed
        )
    }
}

/// Single-pass relayer for one configured chain pair
pub struct Relayer {
    config: Config,
    signer: PrivateKeySigner,
}

impl Relayer {
    pub fn new(config: Config, signer: PrivateKeySigner) -> Self {
        Self { config, signer }
    }

    /// Scan one window in the given direction and relay everything found
    pub async fn run(&self, direction: Direction) -> Result<RelaySummary, RelayError> {
        let (watch_config, exec_config) = match direction {
            Direction::Source => (&self.config.source, &self.config.destination),
            Direction::Destination => (&self.config.destination, &self.config.source),
        };

        let watch = ChainClient::new(watch_config, &self.config.relayer, None)?;
        let exec = ChainClient::new(
            exec_config,
            &self.config.relayer,
            Some(self.signer.clone()),
        )?;
        let account = self.signer.address();

        info!(
            direction = %direction,
            watch_chain = watch.name(),
            exec_chain = exec.name(),
            account = %account,
            bridge = %watch.bridge_address(),
            "Starting relay pass"
        );

        // The two preflight reads hit independent chains and can run
        // concurrently; results are merged back into in-order processing
        let (latest, initial_sequence) =
            match tokio::try_join!(watch.latest_block(), exec.sequence_number(account)) {
                Ok(values) => values,
                Err(e) => {
                    let chain = match &e {
                        RelayError::ChainUnavailable { chain, .. } => chain.clone(),
                        _ => watch.name().to_string(),
                    };
                    metrics::record_error(&chain, e.kind());
                    return Err(e);
                }
            };
        metrics::record_latest_block(watch.name(), latest);

        let window = ScanWindow::compute(latest, self.config.relayer.lookback_blocks);
        let kind = direction.event_kind();
        info!(window = %window, blocks = window.len(), event = %kind, "Scanning window");

        let logs = crate::scanner::scan(&watch, &window, kind).await.map_err(|e| {
            metrics::record_error(watch.name(), e.kind());
            e
        })?;

        let mut summary = RelaySummary {
            direction,
            window,
            events_found: 0,
            relayed: 0,
            unconfirmed: 0,
            failed: 0,
            malformed: 0,
        };

        if logs.is_empty() {
            info!(window = %window, event = %kind, "No events found in window");
            return Ok(summary);
        }

        // Decode in on-chain order; a malformed log is skipped without
        // disturbing its siblings
        let mut events = Vec::with_capacity(logs.len());
        for log in &logs {
            match decode_log(log, kind) {
                Ok(event) => events.push(event),
                Err(e) => {
                    summary.malformed += 1;
                    metrics::record_error(watch.name(), e.kind());
                    warn!(
                        tx_hash = ?log.transaction_hash,
                        log_index = ?log.log_index,
                        error = %e,
                        "Skipping malformed event log"
                    );
                }
            }
        }
        summary.events_found = events.len();
        metrics::record_events_detected(watch.name(), kind.as_str(), events.len());

        let exec_name = exec.name().to_string();
        let mut submitter = Submitter::new(
            exec,
            account,
            self.config.relayer.wait_for_confirmation,
        )
        .with_initial_sequence(initial_sequence);

        for event in &events {
            info!(
                event = %event.event.kind(),
                block = event.block_number,
                log_index = event.log_index,
                amount = %event.event.amount(),
                source_tx = %event.tx_hash,
                "Relaying event"
            );

            let call = build_relay_call(&event.event);
            match submitter.submit(call).await {
                Ok(outcome) => {
                    let tx_hash = outcome.tx_hash();
                    if let SubmitOutcome::Unconfirmed(_) = outcome {
                        summary.unconfirmed += 1;
                        metrics::record_relay(&exec_name, "unconfirmed");
                        warn!(tx_hash = %tx_hash, "Relay unconfirmed; re-query its status before any resubmission");
                    } else {
                        summary.relayed += 1;
                        metrics::record_relay(&exec_name, "success");
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    metrics::record_relay(&exec_name, "failure");
                    metrics::record_error(&exec_name, e.kind());
                    error!(
                        block = event.block_number,
                        log_index = event.log_index,
                        error = %e,
                        "Failed to relay event"
                    );
                }
            }
        }

        for tx in submitter.transactions() {
            tracing::debug!(
                account = %tx.account,
                sequence = tx.sequence,
                function = tx.function,
                status = %tx.status,
                tx_hash = ?tx.tx_hash,
                submitted_at = ?tx.submitted_at,
                "Relay transaction record"
            );
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_clean_only_without_failures() {
        let mut summary = RelaySummary {
            direction: Direction::Source,
            window: ScanWindow::compute(104, 5),
            events_found: 3,
            relayed: 3,
            unconfirmed: 0,
            failed: 0,
            malformed: 0,
        };
        assert!(summary.is_clean());

        summary.failed = 1;
        assert!(!summary.is_clean());

        summary.failed = 0;
        summary.malformed = 1;
        assert!(!summary.is_clean());
    }

    #[test]
    fn test_unconfirmed_does_not_dirty_a_run() {
        let summary = RelaySummary {
            direction: Direction::Destination,
            window: ScanWindow::compute(50, 5),
            events_found: 1,
            relayed: 0,
            unconfirmed: 1,
            failed: 0,
            malformed: 0,
        };
        assert!(summary.is_clean());
    }

    #[test]
    fn test_summary_display_mentions_counts() {
        let summary = RelaySummary {
            direction: Direction::Source,
            window: ScanWindow::compute(104, 5),
            events_found: 2,
            relayed: 1,
            unconfirmed: 0,
            failed: 1,
            malformed: 0,
        };
        let text = summary.to_string();
        assert!(text.contains("2 event(s) found"));
        assert!(text.contains("1 relayed"));
        assert!(text.contains("1 failed"));
        assert!(text.contains("[100, 104]"));
    }
}
