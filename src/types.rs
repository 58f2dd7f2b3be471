//! Common types for one relayer invocation
//!
//! One run watches exactly one chain and executes on the other; the
//! `Direction` run parameter picks which. Token amounts are kept as
//! `U256` end to end since on-chain values routinely exceed 64 bits.

#![allow(dead_code)]

use alloy::primitives::{Address, B256, U256};
use alloy::sol_types::SolEvent;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::contracts::{DestinationBridge, SourceBridge};

/// Which chain this invocation watches for events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Watch the source chain for Deposit events, execute wrap() on the
    /// destination chain
    Source,
    /// Watch the destination chain for Unwrap events, execute withdraw()
    /// on the source chain
    Destination,
}

impl Direction {
    /// Event shape expected on the watched chain
    pub fn event_kind(&self) -> EventKind {
        match self {
            Direction::Source => EventKind::Deposit,
            Direction::Destination => EventKind::Unwrap,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Source => "source",
            Direction::Destination => "destination",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source" => Ok(Direction::Source),
            "destination" => Ok(Direction::Destination),
            other => Err(format!(
                "invalid chain '{}', expected 'source' or 'destination'",
                other
            )),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The two event shapes the relayer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Deposit,
    Unwrap,
}

impl EventKind {
    /// keccak256 hash of the event signature, as it appears in topic0
    pub fn signature_hash(&self) -> B256 {
        match self {
            EventKind::Deposit => SourceBridge::Deposit::SIGNATURE_HASH,
            EventKind::Unwrap => DestinationBridge::Unwrap::SIGNATURE_HASH,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Deposit => "Deposit",
            EventKind::Unwrap => "Unwrap",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decoded bridge event, tagged once at decode time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    Deposit {
        token: Address,
        recipient: Address,
        amount: U256,
    },
    Unwrap {
        underlying_token: Address,
        to: Address,
        amount: U256,
    },
}

impl DomainEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DomainEvent::Deposit { .. } => EventKind::Deposit,
            DomainEvent::Unwrap { .. } => EventKind::Unwrap,
        }
    }

    pub fn amount(&self) -> U256 {
        match self {
            DomainEvent::Deposit { amount, .. } => *amount,
            DomainEvent::Unwrap { amount, .. } => *amount,
        }
    }
}

/// A decoded event together with its position in the source log,
/// preserved so relayed transactions keep the on-chain event order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedEvent {
    pub event: DomainEvent,
    pub block_number: u64,
    pub log_index: u64,
    pub tx_hash: B256,
}

/// Block range scanned in one invocation
///
/// Recomputed fresh on every run from the chain head; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub from_block: u64,
    pub to_block: u64,
}

impl ScanWindow {
    /// Window covering the last `lookback` blocks up to `latest`,
    /// clamped at genesis
    pub fn compute(latest: u64, lookback: u64) -> Self {
        let from_block = latest.saturating_sub(lookback.saturating_sub(1));
        ScanWindow {
            from_block,
            to_block: latest,
        }
    }

    /// Number of blocks covered by the window
    pub fn len(&self) -> u64 {
        self.to_block - self.from_block + 1
    }
}

impl fmt::Display for ScanWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.from_block, self.to_block)
    }
}

/// Lifecycle of one relay transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Built,
    Submitted,
    Confirmed,
    Failed,
    /// Submitted but not confirmed within the timeout; may still land
    Unconfirmed,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Built => "built",
            TxStatus::Submitted => "submitted",
            TxStatus::Confirmed => "confirmed",
            TxStatus::Failed => "failed",
            TxStatus::Unconfirmed => "unconfirmed",
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Record of one relay transaction, owned exclusively by the Submitter
#[derive(Debug, Clone)]
pub struct PendingTransaction {
    pub account: Address,
    pub sequence: u64,
    pub function: &'static str,
    pub tx_hash: Option<B256>,
    pub status: TxStatus,
    pub submitted_at: Option<DateTime<Utc>>,
}
