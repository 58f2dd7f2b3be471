//! Signing key loading
//!
//! The relayer's key lives in a plain text file holding one hex-encoded
//! secret key, with or without a `0x` prefix. It is read exactly once at
//! process start and handed to the Submitter; nothing else touches it and
//! it is never logged or serialized.

use alloy::signers::local::PrivateKeySigner;

use crate::error::RelayError;

/// Load the signing key from `path`. An empty or unreadable file is a
/// fatal startup error.
pub fn load_signing_key(path: &str) -> Result<PrivateKeySigner, RelayError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| RelayError::Config(format!("failed to read key file {}: {}", path, e)))?;

    let key = raw
        .lines()
        .next()
        .unwrap_or("")
        .trim()
        .trim_start_matches("0x");

    if key.is_empty() {
        return Err(RelayError::Config(format!("key file {} is empty", path)));
    }

    key.parse()
        .map_err(|_| RelayError::Config(format!("key file {} does not contain a valid key", path)))
}
