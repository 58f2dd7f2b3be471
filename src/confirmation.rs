//! Receipt polling for submitted relay transactions
//!
//! Polls `eth_getTransactionReceipt` over raw JSON-RPC until the
//! transaction lands or the confirmation timeout elapses. A timeout is
//! reported as `ConfirmationTimeout`: the transaction may still land,
//! and its status can be re-queried idempotently on a later run; it must
//! never be blindly resubmitted.

use alloy::primitives::B256;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::RelayError;

/// Terminal outcome of waiting on a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    /// Included with success status
    Success,
    /// Included but reverted; the sequence number was consumed on-chain
    Reverted,
}

/// EVM transaction receipt from RPC
#[derive(Debug, Deserialize)]
struct TransactionReceipt {
    #[serde(rename = "blockNumber")]
    block_number: Option<String>,
    status: Option<String>,
}

/// EVM RPC response wrapper
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

/// EVM RPC error
#[derive(Debug, Deserialize)]
struct RpcError {
    code: i32,
    message: String,
}

/// Receipt poller for one chain's RPC endpoint
#[derive(Debug)]
pub struct ReceiptPoller {
    chain: String,
    rpc_url: String,
    client: Client,
    poll_interval: Duration,
}

impl ReceiptPoller {
    pub fn new(chain: &str, rpc_url: &str, rpc_timeout: Duration) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(rpc_timeout)
            .build()
            .map_err(|e| RelayError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            chain: chain.to_string(),
            rpc_url: rpc_url.to_string(),
            client,
            poll_interval: Duration::from_millis(1_000),
        })
    }

    /// Block until the transaction has a receipt or `timeout` elapses
    pub async fn wait_for_confirmation(
        &self,
        tx_hash: B256,
        timeout: Duration,
    ) -> Result<ReceiptStatus, RelayError> {
        let poll = async {
            loop {
                if let Some(receipt) = self.transaction_receipt(tx_hash).await? {
                    if receipt.block_number.is_none() {
                        // Known to the node but not yet included
                        tokio::time::sleep(self.poll_interval).await;
                        continue;
                    }
                    if receipt.status.as_deref() == Some("0x0") {
                        return Ok(ReceiptStatus::Reverted);
                    }
                    return Ok(ReceiptStatus::Success);
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        };

        match tokio::time::timeout(timeout, poll).await {
            Ok(result) => result,
            Err(_) => Err(RelayError::ConfirmationTimeout { tx_hash }),
        }
    }

    /// Get the transaction receipt, if any
    async fn transaction_receipt(
        &self,
        tx_hash: B256,
    ) -> Result<Option<TransactionReceipt>, RelayError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "eth_getTransactionReceipt",
            "params": [format!("0x{}", hex::encode(tx_hash))],
            "id": 1
        });

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::ChainUnavailable {
                chain: self.chain.clone(),
                reason: format!("receipt query failed: {}", e),
            })?
            .json::<RpcResponse<TransactionReceipt>>()
            .await
            .map_err(|e| RelayError::ChainUnavailable {
                chain: self.chain.clone(),
                reason: format!("receipt response unreadable: {}", e),
            })?;

        if let Some(error) = response.error {
            return Err(RelayError::ChainUnavailable {
                chain: self.chain.clone(),
                reason: format!("RPC error {}: {}", error.code, error.message),
            });
        }

        Ok(response.result)
    }
}
