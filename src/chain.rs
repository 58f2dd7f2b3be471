//! Chain client
//!
//! Thin RPC handle for one chain: block height, log fetch, account
//! sequence number, gas price, signed submission, receipt wait. Every
//! call is a single network round trip bounded by the configured
//! timeout; failures surface as `ChainUnavailable` and the client never
//! retries on its own. Retry policy belongs to the caller.

use async_trait::async_trait;
use std::future::IntoFuture;
use std::str::FromStr;
use std::time::Duration;

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, B256};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::{Filter, Log, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::{Client, Http};

use crate::builder::RelayCall;
use crate::config::{ChainConfig, RelayerConfig};
use crate::confirmation::{ReceiptPoller, ReceiptStatus};
use crate::error::RelayError;
use crate::submitter::Dispatcher;
use crate::types::ScanWindow;

/// RPC handle for one chain endpoint
#[derive(Debug)]
pub struct ChainClient {
    name: String,
    rpc_url: String,
    chain_id: u64,
    bridge_address: Address,
    provider: RootProvider<Http<Client>>,
    signer: Option<PrivateKeySigner>,
    poller: ReceiptPoller,
    gas_limit: u64,
    rpc_timeout: Duration,
    confirmation_timeout: Duration,
}

impl ChainClient {
    /// Create a client for one chain. Pass the signer only for the chain
    /// this run executes on; watch-only clients never sign.
    pub fn new(
        chain: &ChainConfig,
        relayer: &RelayerConfig,
        signer: Option<PrivateKeySigner>,
    ) -> Result<Self, RelayError> {
        let url = chain
            .rpc_url
            .parse::<reqwest::Url>()
            .map_err(|e| RelayError::Config(format!("invalid RPC URL for {}: {}", chain.name, e)))?;
        let provider = RootProvider::new_http(url);

        let bridge_address = Address::from_str(&chain.bridge_address).map_err(|e| {
            RelayError::Config(format!("invalid bridge address for {}: {}", chain.name, e))
        })?;

        let rpc_timeout = Duration::from_millis(relayer.rpc_timeout_ms);
        let poller = ReceiptPoller::new(&chain.name, &chain.rpc_url, rpc_timeout)?;

        Ok(Self {
            name: chain.name.clone(),
            rpc_url: chain.rpc_url.clone(),
            chain_id: chain.chain_id,
            bridge_address,
            provider,
            signer,
            poller,
            gas_limit: relayer.gas_limit,
            rpc_timeout,
            confirmation_timeout: Duration::from_millis(relayer.confirmation_timeout_ms),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bridge_address(&self) -> Address {
        self.bridge_address
    }

    /// Current chain head
    pub async fn latest_block(&self) -> Result<u64, RelayError> {
        self.rpc_call("latest block query", self.provider.get_block_number())
            .await
    }

    /// All logs emitted by the bridge contract inside the window
    pub async fn bridge_logs(&self, window: &ScanWindow) -> Result<Vec<Log>, RelayError> {
        let filter = Filter::new()
            .address(self.bridge_address)
            .from_block(window.from_block)
            .to_block(window.to_block);

        self.rpc_call("log query", self.provider.get_logs(&filter))
            .await
    }

    /// Run one RPC round trip under the configured timeout
    async fn rpc_call<T, E, F>(&self, what: &str, fut: F) -> Result<T, RelayError>
    where
        E: std::fmt::Display,
        F: IntoFuture<Output = Result<T, E>>,
    {
        match tokio::time::timeout(self.rpc_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(RelayError::ChainUnavailable {
                chain: self.name.clone(),
                reason: format!("{} failed: {}", what, e),
            }),
            Err(_) => Err(RelayError::ChainUnavailable {
                chain: self.name.clone(),
                reason: format!("{} timed out after {:?}", what, self.rpc_timeout),
            }),
        }
    }

    /// Split submission failures from transport failures. The node
    /// rejecting the transaction consumed nothing; a transport error
    /// means we do not know whether the node ever saw it.
    fn classify_send_error(&self, message: String) -> RelayError {
        let lower = message.to_lowercase();
        if lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("connection")
            || lower.contains("network")
            || lower.contains("transport")
        {
            RelayError::ChainUnavailable {
                chain: self.name.clone(),
                reason: message,
            }
        } else {
            RelayError::Submission(message)
        }
    }
}

#[async_trait]
impl Dispatcher for ChainClient {
    async fn sequence_number(&self, account: Address) -> Result<u64, RelayError> {
        self.rpc_call(
            "sequence number query",
            self.provider.get_transaction_count(account),
        )
        .await
    }

    async fn gas_price(&self) -> Result<u128, RelayError> {
        self.rpc_call("gas price query", self.provider.get_gas_price())
            .await
    }

    async fn send(
        &self,
        call: &RelayCall,
        sequence: u64,
        gas_price: u128,
    ) -> Result<B256, RelayError> {
        let signer = self.signer.clone().ok_or_else(|| {
            RelayError::BuildOrSign(format!("no signing key configured for chain '{}'", self.name))
        })?;
        let wallet = EthereumWallet::from(signer);

        let url = self
            .rpc_url
            .parse::<reqwest::Url>()
            .map_err(|e| RelayError::BuildOrSign(format!("invalid RPC URL: {}", e)))?;
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(wallet)
            .on_http(url);

        let tx = TransactionRequest::default()
            .with_to(self.bridge_address)
            .with_input(call.abi_encode())
            .with_nonce(sequence)
            .with_gas_limit(self.gas_limit)
            .with_gas_price(gas_price)
            .with_chain_id(self.chain_id);

        let pending = match tokio::time::timeout(self.rpc_timeout, provider.send_transaction(tx))
            .await
        {
            Ok(Ok(pending)) => pending,
            Ok(Err(e)) => return Err(self.classify_send_error(e.to_string())),
            Err(_) => {
                return Err(RelayError::ChainUnavailable {
                    chain: self.name.clone(),
                    reason: format!("submission timed out after {:?}", self.rpc_timeout),
                })
            }
        };

        Ok(*pending.tx_hash())
    }

    async fn confirm(&self, tx_hash: B256) -> Result<ReceiptStatus, RelayError> {
        self.poller
            .wait_for_confirmation(tx_hash, self.confirmation_timeout)
            .await
    }
}
