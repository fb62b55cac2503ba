//! Error types
//!
//! Two kinds of failure are kept apart: the contract could not be reached
//! ([`DeploymentError`]) or it was reached and answered with the wrong value
//! ([`AssertionError`]).

use std::{fmt, path::PathBuf, time::Duration};
use thiserror::Error;

/// Acquiring a contract handle or invoking one of its accessors failed.
#[derive(Debug, Error)]
pub enum DeploymentError {
    /// HTTP transport failure while talking to the node
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The node answered with a JSON-RPC error object
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message reported by the node
        message: String,
    },

    /// The response carried neither `result` nor `error`
    #[error("no result in response to {method}")]
    MissingResult {
        /// RPC method that was called
        method: String,
    },

    /// The response could not be interpreted
    #[error("invalid response to {method}: {reason}")]
    InvalidResponse {
        /// RPC method that was called
        method: String,
        /// What was wrong with the payload
        reason: String,
    },

    /// No answer within the configured bound
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        /// Operation that was waiting
        operation: String,
        /// The bound that expired
        timeout: Duration,
    },

    /// The build artifact could not be read
    #[error("failed to read artifact {}: {source}", .path.display())]
    ArtifactIo {
        /// Artifact location
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The build artifact is not valid JSON of the expected shape
    #[error("invalid artifact {}: {source}", .path.display())]
    ArtifactFormat {
        /// Artifact location
        path: PathBuf,
        /// Underlying parse error
        source: serde_json::Error,
    },

    /// The artifact has no deployment on the node's network
    #[error("contract {contract} has not been deployed to network {network}")]
    NotDeployed {
        /// Contract name from the artifact
        contract: String,
        /// Network id reported by the node
        network: String,
    },

    /// A recorded address is not a 20-byte hex address
    #[error("invalid contract address {0:?}")]
    InvalidAddress(String),

    /// Nothing is deployed at the resolved address
    #[error("no code at address {address}")]
    NoCode {
        /// Address that was queried
        address: String,
    },

    /// Failure reported by a custom collaborator
    #[error("{0}")]
    Other(String),
}

/// A check reached the contract but the observed value differs from the expected one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct AssertionError {
    /// Name of the failed check
    pub check: &'static str,
    /// Expected value, rendered for humans
    pub expected: String,
    /// Observed value, rendered for humans
    pub actual: String,
    /// Extra diagnostic context, e.g. the decoded form of the actual value
    pub note: Option<String>,
}

impl AssertionError {
    /// Creates a new assertion error
    pub fn new(
        check: &'static str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self { check, expected: expected.into(), actual: actual.into(), note: None }
    }

    /// Attaches a diagnostic note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl fmt::Display for AssertionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: expected {}, actual {}", self.check, self.expected, self.actual)?;
        if let Some(note) = &self.note {
            write!(f, " ({note})")?;
        }
        Ok(())
    }
}

/// Outcome of a failed check.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The contract could not be reached
    #[error("deployment error: {0}")]
    Deployment(#[from] DeploymentError),

    /// The contract answered with an unexpected value
    #[error("assertion error: {0}")]
    Assertion(#[from] AssertionError),
}

impl VerifyError {
    /// Returns `true` for network and runtime failures
    pub const fn is_deployment(&self) -> bool {
        matches!(self, Self::Deployment(_))
    }

    /// Returns `true` for value mismatches
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }
}

/// Invalid harness configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `BALLOT_ADDRESS` is not a 20-byte hex address
    #[error("invalid BALLOT_ADDRESS {0:?}")]
    InvalidAddress(String),

    /// `EXPECTED_WINNER_NAME` is not valid hex
    #[error("invalid EXPECTED_WINNER_NAME {value:?}: {source}")]
    InvalidExpected {
        /// Configured value
        value: String,
        /// Hex decoding failure
        source: hex::FromHexError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assertion_message_shows_both_values() {
        let err = AssertionError::new("winnerName", "0x01", "0x02").with_note("decoded \"\\u{2}\"");
        let msg = err.to_string();
        assert!(msg.contains("expected 0x01"));
        assert!(msg.contains("actual 0x02"));
        assert!(msg.contains("decoded"));
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        let deployment: VerifyError = DeploymentError::Other("connection refused".into()).into();
        let assertion: VerifyError =
            AssertionError::new("deployed", "non-empty address", "\"\"").into();

        assert!(deployment.is_deployment());
        assert!(!deployment.is_assertion());
        assert!(assertion.is_assertion());
        assert!(!assertion.is_deployment());
    }
}
