//! Transaction submitter
//!
//! Owns the signing account and the per-account sequence counter for the
//! execution chain. The sequence number is read from the chain once per
//! run and advanced locally after each accepted submission, so a batch
//! of events discovered in one scan gets unique, strictly increasing
//! sequence numbers without extra round trips. A failed build, sign, or
//! submission never advances the counter: the number was never consumed
//! on-chain and is reused by the next attempt. All allocation for an
//! account/chain pair is serialized through this single owner.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use alloy::primitives::{Address, B256};

use crate::builder::RelayCall;
use crate::confirmation::ReceiptStatus;
use crate::error::RelayError;
use crate::types::{PendingTransaction, TxStatus};

/// The chain-facing side of submission. Implemented by `ChainClient`;
/// test doubles stand in for it to exercise sequence handling without a
/// network.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn sequence_number(&self, account: Address) -> Result<u64, RelayError>;
    async fn gas_price(&self) -> Result<u128, RelayError>;
    async fn send(
        &self,
        call: &RelayCall,
        sequence: u64,
        gas_price: u128,
    ) -> Result<B256, RelayError>;
    async fn confirm(&self, tx_hash: B256) -> Result<ReceiptStatus, RelayError>;
}

/// Outcome of submitting one relay call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted by the node; confirmation was not requested
    Submitted(B256),
    /// Accepted and confirmed on-chain
    Confirmed(B256),
    /// Accepted but not confirmed within the timeout; may still land
    Unconfirmed(B256),
}

impl SubmitOutcome {
    pub fn tx_hash(&self) -> B256 {
        match self {
            SubmitOutcome::Submitted(h)
            | SubmitOutcome::Confirmed(h)
            | SubmitOutcome::Unconfirmed(h) => *h,
        }
    }
}

/// Serializes signing and sequence allocation for one account on one
/// destination chain
pub struct Submitter<D: Dispatcher> {
    dispatcher: D,
    account: Address,
    next_sequence: Option<u64>,
    wait_for_confirmation: bool,
    transactions: Vec<PendingTransaction>,
}

impl<D: Dispatcher> Submitter<D> {
    pub fn new(dispatcher: D, account: Address, wait_for_confirmation: bool) -> Self {
        Self {
            dispatcher,
            account,
            next_sequence: None,
            wait_for_confirmation,
            transactions: Vec::new(),
        }
    }

    /// Seed the cached sequence number, skipping the on-chain read. Used
    /// when the run's preflight already fetched it.
    pub fn with_initial_sequence(mut self, sequence: u64) -> Self {
        self.next_sequence = Some(sequence);
        self
    }

    /// The cached sequence number the next submission will use
    async fn current_sequence(&mut self) -> Result<u64, RelayError> {
        match self.next_sequence {
            Some(sequence) => Ok(sequence),
            None => {
                let sequence = self.dispatcher.sequence_number(self.account).await?;
                info!(
                    account = %self.account,
                    sequence,
                    "Fetched account sequence number"
                );
                self.next_sequence = Some(sequence);
                Ok(sequence)
            }
        }
    }

    /// Sign and submit one relay call, advancing the cached sequence
    /// number only once the node has accepted the transaction
    pub async fn submit(&mut self, call: RelayCall) -> Result<SubmitOutcome, RelayError> {
        let sequence = self.current_sequence().await?;
        let gas_price = self.dispatcher.gas_price().await?;

        let mut record = PendingTransaction {
            account: self.account,
            sequence,
            function: call.function_name(),
            tx_hash: None,
            status: TxStatus::Built,
            submitted_at: None,
        };

        let tx_hash = match self.dispatcher.send(&call, sequence, gas_price).await {
            Ok(tx_hash) => tx_hash,
            Err(e) => {
                // Nothing reached the chain under this sequence number;
                // the next attempt reuses it
                record.status = TxStatus::Failed;
                self.transactions.push(record);
                warn!(
                    function = call.function_name(),
                    sequence,
                    error = %e,
                    "Relay submission failed"
                );
                return Err(e);
            }
        };

        self.next_sequence = Some(sequence + 1);
        record.tx_hash = Some(tx_hash);
        record.status = TxStatus::Submitted;
        record.submitted_at = Some(Utc::now());

        info!(
            function = call.function_name(),
            sequence,
            tx_hash = %tx_hash,
            "Relay transaction submitted"
        );

        if !self.wait_for_confirmation {
            self.transactions.push(record);
            return Ok(SubmitOutcome::Submitted(tx_hash));
        }

        match self.dispatcher.confirm(tx_hash).await {
            Ok(ReceiptStatus::Success) => {
                record.status = TxStatus::Confirmed;
                self.transactions.push(record);
                Ok(SubmitOutcome::Confirmed(tx_hash))
            }
            Ok(ReceiptStatus::Reverted) => {
                // Included and reverted: the sequence number was consumed,
                // so the advance above stands
                record.status = TxStatus::Failed;
                self.transactions.push(record);
                Err(RelayError::Submission(format!(
                    "transaction {} reverted on-chain",
                    tx_hash
                )))
            }
            Err(RelayError::ConfirmationTimeout { .. }) => {
                record.status = TxStatus::Unconfirmed;
                self.transactions.push(record);
                warn!(tx_hash = %tx_hash, sequence, "Relay transaction unconfirmed at timeout");
                Ok(SubmitOutcome::Unconfirmed(tx_hash))
            }
            Err(e) => {
                // Receipt queries failing tells us nothing about the
                // transaction itself
                record.status = TxStatus::Unconfirmed;
                self.transactions.push(record);
                warn!(tx_hash = %tx_hash, sequence, error = %e, "Receipt query failed; treating as unconfirmed");
                Ok(SubmitOutcome::Unconfirmed(tx_hash))
            }
        }
    }

    /// Every transaction this submitter built during the run
    pub fn transactions(&self) -> &[PendingTransaction] {
        &self.transactions
    }
}
