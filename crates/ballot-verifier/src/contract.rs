//! Contract handles and the collaborator that hands them out

use alloy_primitives::Address;
use async_trait::async_trait;
use std::{fmt, sync::Arc};
use tracing::debug;

use crate::{
    encoding::{EncodedValue, WINNER_NAME_SIGNATURE, selector},
    error::DeploymentError,
    rpc::RpcClient,
};

/// Read-only view of a deployed contract instance.
///
/// Handles are owned by the [`Deployer`] that produced them. Checks only
/// borrow them and never mutate contract state.
#[async_trait]
pub trait ContractHandle: Send + Sync + fmt::Debug {
    /// On-chain address; empty when the instance was never deployed
    fn address(&self) -> &str;

    /// Raw return value of the `winnerName()` accessor
    async fn winner_name(&self) -> Result<EncodedValue, DeploymentError>;
}

/// Produces handles to deployed contract instances.
#[async_trait]
pub trait Deployer: Send + Sync {
    /// Locate the deployed instance and return a handle to it
    async fn deployed(&self) -> Result<Arc<dyn ContractHandle>, DeploymentError>;
}

/// Ballot contract reached over JSON-RPC
pub struct BallotContract {
    address: Address,
    /// Checksummed form handed out by [`ContractHandle::address`]
    display: String,
    client: Arc<RpcClient>,
}

impl BallotContract {
    /// Bind a handle to `address` on the node behind `client`
    pub fn new(address: Address, client: Arc<RpcClient>) -> Self {
        Self { display: address.to_checksum(None), address, client }
    }

    /// Parsed on-chain address
    pub const fn raw_address(&self) -> &Address {
        &self.address
    }

    /// Call a zero-argument view function and return the raw result
    pub async fn call(&self, signature: &str) -> Result<EncodedValue, DeploymentError> {
        let calldata = selector(signature);
        debug!(target: "contract", address = %self.display, signature, "eth_call");

        let bytes = self.client.call(&self.address, &calldata).await?;
        Ok(EncodedValue::from(bytes))
    }
}

impl fmt::Debug for BallotContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BallotContract")
            .field("address", &self.display)
            .field("rpc", &self.client.url())
            .finish()
    }
}

#[async_trait]
impl ContractHandle for BallotContract {
    fn address(&self) -> &str {
        &self.display
    }

    async fn winner_name(&self) -> Result<EncodedValue, DeploymentError> {
        self.call(WINNER_NAME_SIGNATURE).await
    }
}
