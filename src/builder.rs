//! Relay transaction builder
//!
//! Pure mapping from a decoded event on one chain to the mirrored
//! function call on the other:
//!
//! | observed event                         | mirrored call                       |
//! |----------------------------------------|-------------------------------------|
//! | Deposit(token, recipient, amount)      | wrap(token, recipient, amount)      |
//! | Unwrap(underlying_token, to, amount)   | withdraw(underlying_token, to, amount) |
//!
//! Argument order is preserved exactly and the amount passes through
//! unmodified; there is no unit conversion between the chains.

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;

use crate::contracts::{DestinationBridge, SourceBridge};
use crate::types::DomainEvent;

/// A fully determined bridge function call, ready to be encoded and
/// submitted on the execution chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayCall {
    Wrap {
        token: Address,
        recipient: Address,
        amount: U256,
    },
    Withdraw {
        underlying_token: Address,
        to: Address,
        amount: U256,
    },
}

impl RelayCall {
    pub fn function_name(&self) -> &'static str {
        match self {
            RelayCall::Wrap { .. } => "wrap",
            RelayCall::Withdraw { .. } => "withdraw",
        }
    }

    /// ABI-encoded calldata, selector included
    pub fn abi_encode(&self) -> Vec<u8> {
        match self {
            RelayCall::Wrap {
                token,
                recipient,
                amount,
            } => DestinationBridge::wrapCall {
                token: *token,
                recipient: *recipient,
                amount: *amount,
            }
            .abi_encode(),
            RelayCall::Withdraw {
                underlying_token,
                to,
                amount,
            } => SourceBridge::withdrawCall {
                underlying_token: *underlying_token,
                to: *to,
                amount: *amount,
            }
            .abi_encode(),
        }
    }
}

/// Map an observed event to the call that mirrors it on the other chain
pub fn build_relay_call(event: &DomainEvent) -> RelayCall {
    match event {
        DomainEvent::Deposit {
            token,
            recipient,
            amount,
        } => RelayCall::Wrap {
            token: *token,
            recipient: *recipient,
            amount: *amount,
        },
        DomainEvent::Unwrap {
            underlying_token,
            to,
            amount,
        } => RelayCall::Withdraw {
            underlying_token: *underlying_token,
            to: *to,
            amount: *amount,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::keccak256;

    // Deterministic pseudo-random test values derived by hashing a seed
    fn test_address(seed: u8) -> Address {
        let hash = keccak256([seed]);
        Address::from_slice(&hash[12..])
    }

    fn test_amount(seed: u8) -> U256 {
        U256::from_be_slice(keccak256([seed, 0xFF]).as_slice())
    }

    #[test]
    fn test_deposit_maps_to_wrap() {
        let token = test_address(1);
        let recipient = test_address(2);
        let amount = U256::from(1_000u64);

        let call = build_relay_call(&DomainEvent::Deposit {
            token,
            recipient,
            amount,
        });

        assert_eq!(
            call,
            RelayCall::Wrap {
                token,
                recipient,
                amount
            }
        );
        assert_eq!(call.function_name(), "wrap");
    }

    #[test]
    fn test_unwrap_maps_to_withdraw() {
        let underlying_token = test_address(3);
        let to = test_address(4);
        let amount = U256::from(42u64);

        let call = build_relay_call(&DomainEvent::Unwrap {
            underlying_token,
            to,
            amount,
        });

        assert_eq!(
            call,
            RelayCall::Withdraw {
                underlying_token,
                to,
                amount
            }
        );
        assert_eq!(call.function_name(), "withdraw");
    }

    #[test]
    fn test_mapping_preserves_arguments_across_varied_inputs() {
        for seed in 0u8..32 {
            let a = test_address(seed);
            let b = test_address(seed.wrapping_add(100));
            let amount = test_amount(seed);

            match build_relay_call(&DomainEvent::Deposit {
                token: a,
                recipient: b,
                amount,
            }) {
                RelayCall::Wrap {
                    token,
                    recipient,
                    amount: out,
                } => {
                    assert_eq!(token, a);
                    assert_eq!(recipient, b);
                    assert_eq!(out, amount);
                }
                other => panic!("Deposit must map to wrap, got {:?}", other),
            }

            match build_relay_call(&DomainEvent::Unwrap {
                underlying_token: a,
                to: b,
                amount,
            }) {
                RelayCall::Withdraw {
                    underlying_token,
                    to,
                    amount: out,
                } => {
                    assert_eq!(underlying_token, a);
                    assert_eq!(to, b);
                    assert_eq!(out, amount);
                }
                other => panic!("Unwrap must map to withdraw, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_amount_passes_through_beyond_u64_range() {
        // Amounts larger than u64::MAX must survive the mapping intact
        let amount = U256::from(u64::MAX) * U256::from(1_000_000u64);
        let call = build_relay_call(&DomainEvent::Deposit {
            token: test_address(9),
            recipient: test_address(10),
            amount,
        });
        match call {
            RelayCall::Wrap { amount: out, .. } => assert_eq!(out, amount),
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_wrap_calldata_layout() {
        let token = test_address(11);
        let recipient = test_address(12);
        let amount = U256::from(7u64);

        let calldata = RelayCall::Wrap {
            token,
            recipient,
            amount,
        }
        .abi_encode();

        // selector + 3 static words
        assert_eq!(calldata.len(), 4 + 32 * 3);
        let selector = &keccak256(b"wrap(address,address,uint256)")[..4];
        assert_eq!(&calldata[..4], selector);

        // argument order: token, recipient, amount
        assert_eq!(&calldata[4 + 12..4 + 32], token.as_slice());
        assert_eq!(&calldata[4 + 32 + 12..4 + 64], recipient.as_slice());
        assert_eq!(
            U256::from_be_slice(&calldata[4 + 64..4 + 96]),
            amount
        );
    }

    #[test]
    fn test_withdraw_calldata_layout() {
        let underlying_token = test_address(13);
        let to = test_address(14);
        let amount = test_amount(15);

        let calldata = RelayCall::Withdraw {
            underlying_token,
            to,
            amount,
        }
        .abi_encode();

        assert_eq!(calldata.len(), 4 + 32 * 3);
        let selector = &keccak256(b"withdraw(address,address,uint256)")[..4];
        assert_eq!(&calldata[..4], selector);

        assert_eq!(&calldata[4 + 12..4 + 32], underlying_token.as_slice());
        assert_eq!(&calldata[4 + 32 + 12..4 + 64], to.as_slice());
        assert_eq!(
            U256::from_be_slice(&calldata[4 + 64..4 + 96]),
            amount
        );
    }
}
