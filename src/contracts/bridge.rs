//! Bridge contract ABI definitions
//!
//! Uses alloy's sol! macro to generate type-safe bindings for the two
//! bridge contracts. Event parameter names and function argument order
//! are the wire-compatibility surface with the deployed contracts and
//! must not be renamed or reordered.

use alloy::sol;

sol! {
    /// Bridge contract on the source chain. Users deposit underlying
    /// tokens here; the relayer releases them when a wrapped-token burn
    /// is observed on the destination chain.
    #[sol(rpc)]
    contract SourceBridge {
        /// Release previously deposited tokens to `to`
        /// Called by the relayer after observing an Unwrap on the
        /// destination chain
        function withdraw(address underlying_token, address to, uint256 amount) external;

        /// Emitted when a user locks tokens for bridging
        event Deposit(
            address indexed token,
            address indexed recipient,
            uint256 amount
        );
    }

    /// Bridge contract on the destination chain. Mints wrapped tokens on
    /// relayer instruction and emits Unwrap when users burn them.
    #[sol(rpc)]
    contract DestinationBridge {
        /// Mint wrapped tokens to `recipient`
        /// Called by the relayer after observing a Deposit on the
        /// source chain
        function wrap(address token, address recipient, uint256 amount) external;

        /// Emitted when a user burns wrapped tokens to exit the bridge
        event Unwrap(
            address indexed underlying_token,
            address indexed to,
            uint256 amount
        );
    }
}
