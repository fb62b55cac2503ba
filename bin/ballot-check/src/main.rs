//! Ballot check binary
//!
//! Runs the Ballot contract suite against the node in `RPC_URL` and exits
//! non-zero when any case fails.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ballot_verifier::{Config, ContractVerifier, RpcClient, RpcDeployer, ballot_suite};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    info!("Configuration:");
    info!("  RPC URL:        {}", config.rpc_url);
    match &config.ballot_address {
        Some(address) => info!("  Ballot address: {}", address),
        None => info!("  Artifact:       {}", config.artifact_path.display()),
    }
    info!("  Call timeout:   {:?}", config.call_timeout());
    info!("  Expected name:  {}", config.expected_winner_name);

    let client = Arc::new(RpcClient::new(&config.rpc_url, config.call_timeout())?);
    let deployer = Arc::new(RpcDeployer::new(client, config.address_source()?));
    let verifier = Arc::new(ContractVerifier::new(config.call_timeout()));

    let report = ballot_suite(config.expected()?).run(deployer, verifier).await;
    println!("{report}");

    if !report.is_success() {
        error!("{} of {} checks failed", report.failed(), report.cases.len());
        std::process::exit(1);
    }

    Ok(())
}
