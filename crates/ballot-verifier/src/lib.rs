//! Verification harness for a deployed Ballot contract
//!
//! A [`Deployer`] locates the contract and hands out a [`ContractHandle`];
//! a [`ContractVerifier`] checks that the handle has an address and that
//! `winnerName()` returns the expected raw value. [`ballot_suite`] bundles
//! both checks into a [`Suite`] that runs them concurrently.

pub mod config;
pub mod contract;
pub mod decode;
pub mod deployer;
pub mod encoding;
pub mod error;
pub mod rpc;
pub mod suite;
pub mod verifier;

pub use config::Config;
pub use contract::{BallotContract, ContractHandle, Deployer};
pub use decode::{AsciiDecoder, Decoder, PaddedAsciiDecoder};
pub use deployer::{AddressSource, Artifact, RpcDeployer};
pub use encoding::{EXPECTED_WINNER_NAME, EncodedValue};
pub use error::{AssertionError, ConfigError, DeploymentError, VerifyError};
pub use rpc::RpcClient;
pub use suite::{CaseReport, Check, Suite, SuiteReport, TestCase, ballot_suite};
pub use verifier::{ContractVerifier, DEFAULT_CALL_TIMEOUT};
