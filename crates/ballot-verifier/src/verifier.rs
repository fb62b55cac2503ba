//! The two Ballot checks

use alloy_primitives::Address;
use std::{fmt, future::Future, str::FromStr, sync::Arc, time::Duration};
use tracing::{info, warn};

use crate::{
    contract::{ContractHandle, Deployer},
    decode::{Decoder, PaddedAsciiDecoder},
    encoding::EncodedValue,
    error::{AssertionError, DeploymentError, VerifyError},
};

/// Default bound on a single round trip to the node
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs checks against a deployed contract handle.
///
/// Holds no per-check state, so one verifier can serve concurrent checks.
pub struct ContractVerifier {
    timeout: Duration,
    decoder: Box<dyn Decoder>,
}

impl ContractVerifier {
    /// Create a verifier that bounds every round trip by `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self { timeout, decoder: Box::new(PaddedAsciiDecoder) }
    }

    /// Replace the decoder used for diagnostic output
    pub fn with_decoder(mut self, decoder: impl Decoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    /// Round-trip bound
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Acquire a handle from the deployment collaborator
    pub async fn deployed(
        &self,
        deployer: &dyn Deployer,
    ) -> Result<Arc<dyn ContractHandle>, DeploymentError> {
        self.bounded("deployed()", deployer.deployed()).await
    }

    /// The handle carries a non-empty, well-formed account address.
    pub fn check_deployed(&self, handle: &dyn ContractHandle) -> Result<Address, VerifyError> {
        let address = handle.address();
        info!(target: "verifier", address, "Contract address");

        if address.is_empty() {
            return Err(AssertionError::new("deployed", "non-empty address", "\"\"").into());
        }

        Address::from_str(address).map_err(|_| {
            AssertionError::new("deployed", "20-byte hex address", format!("{address:?}")).into()
        })
    }

    /// `winnerName()` returns exactly `expected`, compared byte for byte.
    ///
    /// The decoded form is only logged and attached to the failure message.
    pub async fn check_winner_name(
        &self,
        handle: &dyn ContractHandle,
        expected: &EncodedValue,
    ) -> Result<EncodedValue, VerifyError> {
        let actual = self.bounded("winnerName()", handle.winner_name()).await?;
        let decoded = self.decoder.decode(actual.as_bytes());
        info!(target: "verifier", winner_name = ?decoded, raw = %actual, "Winner name");

        if actual.as_bytes() != expected.as_bytes() {
            warn!(target: "verifier", %expected, %actual, "Winner name mismatch");
            return Err(AssertionError::new("winnerName", expected.to_hex(), actual.to_hex())
                .with_note(format!("decoded {decoded:?}"))
                .into());
        }

        Ok(actual)
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        fut: impl Future<Output = Result<T, DeploymentError>>,
    ) -> Result<T, DeploymentError> {
        tokio::time::timeout(self.timeout, fut).await.map_err(|_| DeploymentError::Timeout {
            operation: operation.to_string(),
            timeout: self.timeout,
        })?
    }
}

impl Default for ContractVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_CALL_TIMEOUT)
    }
}

impl fmt::Debug for ContractVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractVerifier").field("timeout", &self.timeout).finish_non_exhaustive()
    }
}
