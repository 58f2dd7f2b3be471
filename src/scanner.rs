//! Event scanner
//!
//! Computes the scan window from the chain head and a fixed lookback,
//! fetches the bridge contract's logs for that range, and keeps only the
//! expected event shape, ordered by (block number, log index) ascending.
//! That ordering is preserved all the way to submission so relayed
//! transactions mirror the order the source events occurred in. An empty
//! result is a normal "nothing to relay" outcome, not an error.
//!
//! The window is re-derived on every invocation; nothing is persisted
//! between runs.

use alloy::rpc::types::Log;
use tracing::debug;

use crate::chain::ChainClient;
use crate::error::RelayError;
use crate::types::{EventKind, ScanWindow};

/// Fetch the logs of `kind` inside `window`, in on-chain order
pub async fn scan(
    client: &ChainClient,
    window: &ScanWindow,
    kind: EventKind,
) -> Result<Vec<Log>, RelayError> {
    let logs = client.bridge_logs(window).await?;
    let total = logs.len();

    let mut matching: Vec<Log> = logs
        .into_iter()
        .filter(|log| {
            let topics = log.topics();
            !topics.is_empty() && topics[0] == kind.signature_hash()
        })
        .collect();
    sort_logs(&mut matching);

    debug!(
        chain = client.name(),
        window = %window,
        event = %kind,
        total_logs = total,
        matching = matching.len(),
        "Scanned window"
    );

    Ok(matching)
}

/// Order logs the way the chain emitted them
pub fn sort_logs(logs: &mut [Log]) {
    logs.sort_by_key(|log| {
        (
            log.block_number.unwrap_or(u64::MAX),
            log.log_index.unwrap_or(u64::MAX),
        )
    });
}
