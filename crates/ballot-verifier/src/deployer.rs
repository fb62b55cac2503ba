//! Locating a deployed Ballot through a node
//!
//! The address comes either from configuration or from a Truffle build
//! artifact (`build/contracts/<name>.json`), whose `networks` map records one
//! deployment per network id. Either way the node must report bytecode at the
//! address before a handle is returned.

use alloy_primitives::Address;
use async_trait::async_trait;
use serde::Deserialize;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};
use tracing::{info, warn};

use crate::{
    contract::{BallotContract, ContractHandle, Deployer},
    error::DeploymentError,
    rpc::RpcClient,
};

/// Where the contract address comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressSource {
    /// Explicit address
    Fixed(Address),
    /// Truffle artifact, keyed by network id
    Artifact(PathBuf),
}

/// One deployment recorded in an artifact
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDeployment {
    /// Contract address on that network
    pub address: String,
    /// Deployment transaction, when recorded
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

/// Subset of a Truffle build artifact
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Contract name
    pub contract_name: String,
    /// Deployments keyed by network id
    #[serde(default)]
    pub networks: HashMap<String, NetworkDeployment>,
}

impl Artifact {
    /// Read and parse an artifact file
    pub async fn load(path: &Path) -> Result<Self, DeploymentError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DeploymentError::ArtifactIo { path: path.to_path_buf(), source })?;

        serde_json::from_str(&json)
            .map_err(|source| DeploymentError::ArtifactFormat { path: path.to_path_buf(), source })
    }

    /// Address deployed on `network`
    pub fn address_on(&self, network: &str) -> Result<Address, DeploymentError> {
        let deployment = self.networks.get(network).ok_or_else(|| DeploymentError::NotDeployed {
            contract: self.contract_name.clone(),
            network: network.to_string(),
        })?;

        Address::from_str(&deployment.address)
            .map_err(|_| DeploymentError::InvalidAddress(deployment.address.clone()))
    }
}

/// [`Deployer`] backed by a JSON-RPC node
#[derive(Debug)]
pub struct RpcDeployer {
    client: Arc<RpcClient>,
    source: AddressSource,
}

impl RpcDeployer {
    /// Create a deployer that resolves addresses from `source`
    pub const fn new(client: Arc<RpcClient>, source: AddressSource) -> Self {
        Self { client, source }
    }

    /// Resolve the contract address without checking for code
    pub async fn resolve_address(&self) -> Result<Address, DeploymentError> {
        match &self.source {
            AddressSource::Fixed(address) => Ok(*address),
            AddressSource::Artifact(path) => {
                let artifact = Artifact::load(path).await?;
                let network = self.client.net_version().await?;
                let address = artifact.address_on(&network)?;
                info!(
                    target: "deployer",
                    contract = %artifact.contract_name,
                    network = %network,
                    %address,
                    "Resolved address from artifact"
                );
                Ok(address)
            }
        }
    }
}

#[async_trait]
impl Deployer for RpcDeployer {
    async fn deployed(&self) -> Result<Arc<dyn ContractHandle>, DeploymentError> {
        let address = self.resolve_address().await?;

        let code = self.client.get_code(&address).await?;
        if code.is_empty() {
            warn!(target: "deployer", %address, "No code at contract address");
            return Err(DeploymentError::NoCode { address: address.to_string() });
        }

        Ok(Arc::new(BallotContract::new(address, Arc::clone(&self.client))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use std::{io::Write, net::TcpListener, time::Duration};
    use tempfile::NamedTempFile;

    const BALLOT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    fn localhost_binding_permitted() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn artifact_json() -> String {
        format!(
            r#"{{
                "contractName": "ballot",
                "abi": [],
                "networks": {{
                    "5777": {{
                        "events": {{}},
                        "links": {{}},
                        "address": "{BALLOT}",
                        "transactionHash": "0x{tx_hash}"
                    }}
                }}
            }}"#,
            tx_hash = "11".repeat(32)
        )
    }

    fn write_artifact(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_artifact_address_lookup() {
        let artifact: Artifact = serde_json::from_str(&artifact_json()).unwrap();
        assert_eq!(artifact.contract_name, "ballot");
        assert_eq!(artifact.address_on("5777").unwrap(), Address::from_str(BALLOT).unwrap());

        let err = artifact.address_on("1").unwrap_err();
        assert!(matches!(err, DeploymentError::NotDeployed { ref network, .. } if network == "1"));
    }

    #[tokio::test]
    async fn test_artifact_load_errors() {
        let missing = Artifact::load(Path::new("/nonexistent/ballot.json")).await.unwrap_err();
        assert!(matches!(missing, DeploymentError::ArtifactIo { .. }));

        let file = write_artifact("{ not json");
        let malformed = Artifact::load(file.path()).await.unwrap_err();
        assert!(matches!(malformed, DeploymentError::ArtifactFormat { .. }));
    }

    #[tokio::test]
    async fn test_deployed_from_artifact() {
        if !localhost_binding_permitted() {
            return;
        }
        let mut server = Server::new_async().await;
        let _version = server
            .mock("POST", "/")
            .match_body(Matcher::Regex(r#""method":"net_version""#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"5777"}"#)
            .create_async()
            .await;
        let _code = server
            .mock("POST", "/")
            .match_body(Matcher::Regex(r#""method":"eth_getCode""#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":2,"result":"0x6080604052"}"#)
            .create_async()
            .await;

        let file = write_artifact(&artifact_json());
        let client = Arc::new(RpcClient::new(server.url(), Duration::from_secs(5)).unwrap());
        let deployer = RpcDeployer::new(client, AddressSource::Artifact(file.path().to_path_buf()));

        let handle = deployer.deployed().await.unwrap();
        assert_eq!(handle.address(), BALLOT);
    }

    #[tokio::test]
    async fn test_deployed_without_code() {
        if !localhost_binding_permitted() {
            return;
        }
        let mut server = Server::new_async().await;
        let _code = server
            .mock("POST", "/")
            .match_body(Matcher::Regex(r#""method":"eth_getCode""#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x"}"#)
            .create_async()
            .await;

        let client = Arc::new(RpcClient::new(server.url(), Duration::from_secs(5)).unwrap());
        let deployer =
            RpcDeployer::new(client, AddressSource::Fixed(Address::from_str(BALLOT).unwrap()));

        let err = deployer.deployed().await.unwrap_err();
        assert!(matches!(err, DeploymentError::NoCode { .. }));
    }

    #[tokio::test]
    async fn test_artifact_missing_network() {
        if !localhost_binding_permitted() {
            return;
        }
        let mut server = Server::new_async().await;
        let _version = server
            .mock("POST", "/")
            .match_body(Matcher::Regex(r#""method":"net_version""#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"1"}"#)
            .create_async()
            .await;

        let file = write_artifact(&artifact_json());
        let client = Arc::new(RpcClient::new(server.url(), Duration::from_secs(5)).unwrap());
        let deployer = RpcDeployer::new(client, AddressSource::Artifact(file.path().to_path_buf()));

        let err = deployer.deployed().await.unwrap_err();
        assert!(matches!(
            err,
            DeploymentError::NotDeployed { ref contract, .. } if contract == "ballot"
        ));
    }
}
