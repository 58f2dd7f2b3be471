//! Error taxonomy for a relayer run
//!
//! Distinguishes pre-flight configuration failures (fatal for the whole
//! run) from per-event failures (reported, siblings in the same window
//! continue).

use alloy::primitives::B256;
use thiserror::Error;

/// Errors raised while scanning, building, or relaying events
#[derive(Debug, Error)]
pub enum RelayError {
    /// Missing or invalid configuration. Always fatal, detected pre-flight.
    #[error("configuration error: {0}")]
    Config(String),

    /// An RPC round trip failed or timed out. Aborts the current scan;
    /// no partial window is silently skipped.
    #[error("chain '{chain}' unavailable: {reason}")]
    ChainUnavailable { chain: String, reason: String },

    /// A log did not match the expected event shape. Only that event is
    /// skipped; the rest of the window continues.
    #[error("malformed event log: {0}")]
    MalformedEvent(String),

    /// Building or signing the relay transaction failed. The cached
    /// sequence number was never consumed and must not advance.
    #[error("failed to build or sign relay transaction: {0}")]
    BuildOrSign(String),

    /// The destination chain rejected the submission.
    #[error("transaction submission rejected: {0}")]
    Submission(String),

    /// The submitted transaction was not confirmed within the configured
    /// timeout. It may still land; the outcome is "unconfirmed", not a
    /// definite failure.
    #[error("confirmation timed out for transaction {tx_hash}")]
    ConfirmationTimeout { tx_hash: B256 },
}

impl RelayError {
    /// Short label used for metrics and summary counters
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Config(_) => "config",
            RelayError::ChainUnavailable { .. } => "chain_unavailable",
            RelayError::MalformedEvent(_) => "malformed_event",
            RelayError::BuildOrSign(_) => "build_or_sign",
            RelayError::Submission(_) => "submission",
            RelayError::ConfirmationTimeout { .. } => "confirmation_timeout",
        }
    }
}
