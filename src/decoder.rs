//! Event decoding
//!
//! Pure mapping from a raw log to a typed `DomainEvent`, parameterized
//! by the event shape the caller expects. Both event shapes carry two
//! indexed address parameters and a single uint256 data word:
//!
//!   topics[0] = event signature
//!   topics[1] = first address (token / underlying_token)
//!   topics[2] = second address (recipient / to)
//!   data      = amount (uint256)
//!
//! Any deviation is a `MalformedEvent` for that log only; a missing or
//! mistyped field is never coerced or defaulted.

use alloy::primitives::{Address, B256, U256};
use alloy::rpc::types::Log;

use crate::error::RelayError;
use crate::types::{DomainEvent, EventKind, OrderedEvent};

/// Decode a raw log into a typed event of the expected kind
pub fn decode_log(log: &Log, kind: EventKind) -> Result<OrderedEvent, RelayError> {
    let topics = log.topics();

    if topics.is_empty() {
        return Err(RelayError::MalformedEvent("log has no topics".into()));
    }
    if topics[0] != kind.signature_hash() {
        return Err(RelayError::MalformedEvent(format!(
            "topic0 {} does not match the {} signature",
            topics[0], kind
        )));
    }
    if topics.len() != 3 {
        return Err(RelayError::MalformedEvent(format!(
            "{} expects 2 indexed parameters, log has {} topics",
            kind,
            topics.len()
        )));
    }

    let first = address_from_topic(&topics[1], "first indexed parameter")?;
    let second = address_from_topic(&topics[2], "second indexed parameter")?;

    let data = log.data().data.as_ref();
    if data.len() != 32 {
        return Err(RelayError::MalformedEvent(format!(
            "amount word must be 32 bytes, got {}",
            data.len()
        )));
    }
    let amount = U256::from_be_slice(data);

    let event = match kind {
        EventKind::Deposit => DomainEvent::Deposit {
            token: first,
            recipient: second,
            amount,
        },
        EventKind::Unwrap => DomainEvent::Unwrap {
            underlying_token: first,
            to: second,
            amount,
        },
    };

    let block_number = log
        .block_number
        .ok_or_else(|| RelayError::MalformedEvent("missing block number".into()))?;
    let log_index = log
        .log_index
        .ok_or_else(|| RelayError::MalformedEvent("missing log index".into()))?;
    let tx_hash = log
        .transaction_hash
        .ok_or_else(|| RelayError::MalformedEvent("missing transaction hash".into()))?;

    Ok(OrderedEvent {
        event,
        block_number,
        log_index,
        tx_hash,
    })
}

/// Extract an address from an indexed topic. Address topics are
/// left-padded to 32 bytes; non-zero padding means the field is not an
/// address at all.
fn address_from_topic(topic: &B256, what: &str) -> Result<Address, RelayError> {
    let bytes = topic.as_slice();
    if bytes[..12].iter().any(|&b| b != 0) {
        return Err(RelayError::MalformedEvent(format!(
            "{} is not an address: non-zero padding in topic",
            what
        )));
    }
    Ok(Address::from_slice(&bytes[12..]))
}
