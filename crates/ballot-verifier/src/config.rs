//! Configuration

use alloy_primitives::Address;
use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::{
    deployer::AddressSource,
    encoding::{EXPECTED_WINNER_NAME, EncodedValue, decode_hex},
    error::ConfigError,
};

/// Harness configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// JSON-RPC endpoint of the node
    pub rpc_url: String,
    /// Ballot address; takes precedence over the artifact
    pub ballot_address: Option<String>,
    /// Truffle build artifact used when no address is given
    pub artifact_path: PathBuf,
    /// Bound on each round trip, in seconds
    pub call_timeout_secs: u64,
    /// Expected raw `winnerName()` value, hex
    pub expected_winner_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            ballot_address: None,
            artifact_path: PathBuf::from("build/contracts/ballot.json"),
            call_timeout_secs: 10,
            expected_winner_name: EXPECTED_WINNER_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key/value source, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            rpc_url: lookup("RPC_URL").unwrap_or(defaults.rpc_url),
            ballot_address: lookup("BALLOT_ADDRESS").filter(|s| !s.is_empty()),
            artifact_path: lookup("BALLOT_ARTIFACT")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifact_path),
            call_timeout_secs: lookup("CALL_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.call_timeout_secs),
            expected_winner_name: lookup("EXPECTED_WINNER_NAME")
                .unwrap_or(defaults.expected_winner_name),
        }
    }

    /// Round-trip bound
    pub const fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Where the deployer should look for the contract
    pub fn address_source(&self) -> Result<AddressSource, ConfigError> {
        match &self.ballot_address {
            Some(address) => Address::from_str(address)
                .map(AddressSource::Fixed)
                .map_err(|_| ConfigError::InvalidAddress(address.clone())),
            None => Ok(AddressSource::Artifact(self.artifact_path.clone())),
        }
    }

    /// Parsed expected value
    pub fn expected(&self) -> Result<EncodedValue, ConfigError> {
        decode_hex(&self.expected_winner_name)
            .map(EncodedValue::from)
            .map_err(|source| ConfigError::InvalidExpected {
                value: self.expected_winner_name.clone(),
                source,
            })
    }
}
