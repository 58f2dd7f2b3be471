//! Relayer configuration
//!
//! Runtime settings come from environment variables (a `.env` file is
//! honored if present). Contract addresses come from a JSON file keyed
//! by chain identifier, read once at startup; a missing chain key is a
//! fatal configuration error, never a silent default.

use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::Path;

use crate::error::RelayError;

/// Main configuration for the relayer
#[derive(Debug, Clone)]
pub struct Config {
    pub source: ChainConfig,
    pub destination: ChainConfig,
    pub relayer: RelayerConfig,
}

/// Per-chain endpoint configuration. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Chain identifier, also the key into the contract info file
    pub name: String,
    pub rpc_url: String,
    pub chain_id: u64,
    pub bridge_address: String,
}

/// Relayer behavior knobs
#[derive(Clone)]
pub struct RelayerConfig {
    /// How many trailing blocks each scan re-examines
    pub lookback_blocks: u64,
    /// Per-RPC-call timeout
    pub rpc_timeout_ms: u64,
    /// Total time to wait for a submitted transaction's receipt
    pub confirmation_timeout_ms: u64,
    /// Gas budget for relay transactions
    pub gas_limit: u64,
    /// Block until each relay transaction confirms before submitting the
    /// next one. Stronger per-event ordering at the cost of throughput.
    pub wait_for_confirmation: bool,
    /// Path to the secret key file
    pub private_key_file: String,
    /// Optional node-exporter textfile to dump run metrics into
    pub metrics_textfile: Option<String>,
}

/// Custom Debug that elides the key file path from config dumps.
impl fmt::Debug for RelayerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayerConfig")
            .field("lookback_blocks", &self.lookback_blocks)
            .field("rpc_timeout_ms", &self.rpc_timeout_ms)
            .field("confirmation_timeout_ms", &self.confirmation_timeout_ms)
            .field("gas_limit", &self.gas_limit)
            .field("wait_for_confirmation", &self.wait_for_confirmation)
            .field("private_key_file", &"<elided>")
            .field("metrics_textfile", &self.metrics_textfile)
            .finish()
    }
}

/// One entry in the contract info file
#[derive(Debug, Clone, Deserialize)]
struct ContractEntry {
    address: String,
}

/// Contract info file: chain identifier -> contract entry
#[derive(Debug, Clone, Deserialize)]
struct ContractInfoFile {
    source: Option<ContractEntry>,
    destination: Option<ContractEntry>,
}

fn default_lookback_blocks() -> u64 {
    5
}

fn default_rpc_timeout_ms() -> u64 {
    10_000
}

fn default_confirmation_timeout_ms() -> u64 {
    60_000
}

fn default_gas_limit() -> u64 {
    200_000
}

impl Config {
    /// Load configuration, honoring a `.env` file when present
    pub fn load() -> Result<Self, RelayError> {
        if Path::new(".env").exists() {
            dotenvy::from_filename(".env")
                .map_err(|e| RelayError::Config(format!("failed to load .env file: {}", e)))?;
        }
        Self::load_from_env()
    }

    /// Load configuration from environment variables and the contract
    /// info file
    fn load_from_env() -> Result<Self, RelayError> {
        let contract_info_path =
            env::var("CONTRACT_INFO").unwrap_or_else(|_| "contract_info.json".to_string());
        let contracts = load_contract_info(&contract_info_path)?;

        let source = ChainConfig {
            name: "source".to_string(),
            rpc_url: require_env("SOURCE_RPC_URL")?,
            chain_id: require_env("SOURCE_CHAIN_ID")?
                .parse()
                .map_err(|_| RelayError::Config("SOURCE_CHAIN_ID must be a valid u64".into()))?,
            bridge_address: contracts
                .source
                .ok_or_else(|| {
                    RelayError::Config(format!(
                        "no 'source' key in contract info file {}",
                        contract_info_path
                    ))
                })?
                .address,
        };

        let destination = ChainConfig {
            name: "destination".to_string(),
            rpc_url: require_env("DEST_RPC_URL")?,
            chain_id: require_env("DEST_CHAIN_ID")?
                .parse()
                .map_err(|_| RelayError::Config("DEST_CHAIN_ID must be a valid u64".into()))?,
            bridge_address: contracts
                .destination
                .ok_or_else(|| {
                    RelayError::Config(format!(
                        "no 'destination' key in contract info file {}",
                        contract_info_path
                    ))
                })?
                .address,
        };

        let relayer = RelayerConfig {
            lookback_blocks: env_or_default("LOOKBACK_BLOCKS", default_lookback_blocks())?,
            rpc_timeout_ms: env_or_default("RPC_TIMEOUT_MS", default_rpc_timeout_ms())?,
            confirmation_timeout_ms: env_or_default(
                "CONFIRMATION_TIMEOUT_MS",
                default_confirmation_timeout_ms(),
            )?,
            gas_limit: env_or_default("GAS_LIMIT", default_gas_limit())?,
            wait_for_confirmation: env::var("WAIT_FOR_CONFIRMATION")
                .ok()
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(true),
            private_key_file: env::var("PRIVATE_KEY_FILE").unwrap_or_else(|_| "sk.txt".to_string()),
            metrics_textfile: env::var("METRICS_TEXTFILE").ok(),
        };

        let config = Config {
            source,
            destination,
            relayer,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), RelayError> {
        for chain in [&self.source, &self.destination] {
            if chain.rpc_url.is_empty() {
                return Err(RelayError::Config(format!(
                    "{}.rpc_url cannot be empty",
                    chain.name
                )));
            }
            if chain.bridge_address.len() != 42 || !chain.bridge_address.starts_with("0x") {
                return Err(RelayError::Config(format!(
                    "{} bridge address must be a valid hex address (42 chars with 0x prefix)",
                    chain.name
                )));
            }
        }

        if self.source.chain_id == self.destination.chain_id {
            return Err(RelayError::Config(
                "source and destination must be different chains".into(),
            ));
        }

        if self.relayer.lookback_blocks == 0 {
            return Err(RelayError::Config(
                "LOOKBACK_BLOCKS must be at least 1".into(),
            ));
        }

        if self.relayer.gas_limit == 0 {
            return Err(RelayError::Config("GAS_LIMIT must be non-zero".into()));
        }

        Ok(())
    }
}

/// Read the contract info file mapping chain identifiers to deployed
/// contract addresses
fn load_contract_info(path: &str) -> Result<ContractInfoFile, RelayError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        RelayError::Config(format!("failed to read contract info file {}: {}", path, e))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        RelayError::Config(format!(
            "failed to parse contract info file {}: {}",
            path, e
        ))
    })
}

fn require_env(key: &str) -> Result<String, RelayError> {
    env::var(key).map_err(|_| RelayError::Config(format!("{} environment variable is required", key)))
}

fn env_or_default(key: &str, default: u64) -> Result<u64, RelayError> {
    match env::var(key) {
        Ok(v) => v
            .parse()
            .map_err(|_| RelayError::Config(format!("{} must be a valid u64", key))),
        Err(_) => Ok(default),
    }
}
