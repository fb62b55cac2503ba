//! Test cases, the suite that collects them, and its report
//!
//! A [`Suite`] is built explicitly, run once and turned into a
//! [`SuiteReport`]. Each case runs in its own task and acquires its own
//! handle, so a failing deployment only fails the cases that needed it.

use std::{
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{error, info};

use crate::{
    contract::Deployer,
    encoding::EncodedValue,
    error::{DeploymentError, VerifyError},
    verifier::ContractVerifier,
};

/// What a case checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// Non-empty, well-formed address
    Deployed,
    /// `winnerName()` equals `expected` byte for byte
    WinnerName {
        /// Raw expected value
        expected: EncodedValue,
    },
}

/// A named check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Human-readable description
    pub name: String,
    /// The check to run
    pub check: Check,
}

impl TestCase {
    /// Create a case
    pub fn new(name: impl Into<String>, check: Check) -> Self {
        Self { name: name.into(), check }
    }

    async fn run(
        self,
        deployer: Arc<dyn Deployer>,
        verifier: Arc<ContractVerifier>,
    ) -> Result<(), VerifyError> {
        let handle = verifier.deployed(deployer.as_ref()).await?;

        match self.check {
            Check::Deployed => verifier.check_deployed(handle.as_ref()).map(drop),
            Check::WinnerName { expected } => {
                verifier.check_winner_name(handle.as_ref(), &expected).await.map(drop)
            }
        }
    }
}

/// An ordered collection of cases
#[derive(Debug, Clone, Default)]
pub struct Suite {
    title: String,
    cases: Vec<TestCase>,
}

impl Suite {
    /// Empty suite
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), cases: Vec::new() }
    }

    /// Add a case, builder style
    pub fn case(mut self, name: impl Into<String>, check: Check) -> Self {
        self.register(TestCase::new(name, check));
        self
    }

    /// Add a case
    pub fn register(&mut self, case: TestCase) {
        self.cases.push(case);
    }

    /// Suite title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Registered cases
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Number of registered cases
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Run every case concurrently. Reports keep registration order.
    pub async fn run(
        self,
        deployer: Arc<dyn Deployer>,
        verifier: Arc<ContractVerifier>,
    ) -> SuiteReport {
        info!(target: "suite", title = %self.title, cases = self.cases.len(), "Running suite");

        let handles: Vec<_> = self
            .cases
            .into_iter()
            .map(|case| {
                let name = case.name.clone();
                let deployer = Arc::clone(&deployer);
                let verifier = Arc::clone(&verifier);
                let task = tokio::spawn(async move {
                    let started = Instant::now();
                    let outcome = case.run(deployer, verifier).await;
                    (outcome, started.elapsed())
                });
                (name, task)
            })
            .collect();

        let mut cases = Vec::with_capacity(handles.len());
        for (name, task) in handles {
            let (outcome, duration) = match task.await {
                Ok(result) => result,
                Err(e) => {
                    let failure = DeploymentError::Other(format!("case task failed: {e}"));
                    (Err(failure.into()), Duration::ZERO)
                }
            };

            match &outcome {
                Ok(()) => info!(target: "suite", case = %name, ?duration, "✓ passed"),
                Err(e) => error!(target: "suite", case = %name, error = %e, "✗ failed"),
            }
            cases.push(CaseReport { name, duration, outcome });
        }

        SuiteReport { title: self.title, cases }
    }
}

/// The two checks against a deployed Ballot
pub fn ballot_suite(expected: EncodedValue) -> Suite {
    Suite::new("BallotSmartContract")
        .case("Should deploy the smart contract properly", Check::Deployed)
        .case("Should display the winnerName", Check::WinnerName { expected })
}

/// Result of one case
#[derive(Debug)]
pub struct CaseReport {
    /// Case name
    pub name: String,
    /// Wall time spent in the case
    pub duration: Duration,
    /// `Ok` when the check passed
    pub outcome: Result<(), VerifyError>,
}

impl CaseReport {
    /// Whether the case passed
    pub const fn passed(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Failure, if any
    pub fn error(&self) -> Option<&VerifyError> {
        self.outcome.as_ref().err()
    }
}

/// Result of a suite run
#[derive(Debug)]
pub struct SuiteReport {
    /// Suite title
    pub title: String,
    /// One report per case, in registration order
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    /// Number of passing cases
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    /// Number of failing cases
    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    /// True when every case passed
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for case in &self.cases {
            let mark = if case.passed() { '✓' } else { '✗' };
            writeln!(f, "  {mark} {} ({}ms)", case.name, case.duration.as_millis())?;
        }

        writeln!(f)?;
        write!(f, "{} passing, {} failing", self.passed(), self.failed())?;

        let failures = self.cases.iter().filter_map(|c| c.error().map(|e| (&c.name, e)));
        for (i, (name, err)) in failures.enumerate() {
            write!(f, "\n\n  {}) {name}:\n     {err}", i + 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        contract::ContractHandle,
        verifier::tests::{BALLOT, StaticHandle},
    };
    use async_trait::async_trait;

    struct StaticDeployer(Arc<StaticHandle>);

    #[async_trait]
    impl Deployer for StaticDeployer {
        async fn deployed(&self) -> Result<Arc<dyn ContractHandle>, DeploymentError> {
            Ok(Arc::clone(&self.0) as Arc<dyn ContractHandle>)
        }
    }

    struct UnreachableDeployer;

    #[async_trait]
    impl Deployer for UnreachableDeployer {
        async fn deployed(&self) -> Result<Arc<dyn ContractHandle>, DeploymentError> {
            Err(DeploymentError::Other("network unreachable".to_string()))
        }
    }

    struct SlowDeployer(Duration);

    #[async_trait]
    impl Deployer for SlowDeployer {
        async fn deployed(&self) -> Result<Arc<dyn ContractHandle>, DeploymentError> {
            tokio::time::sleep(self.0).await;
            let handle = StaticHandle::returning(&EncodedValue::expected_winner_name());
            Ok(Arc::new(handle))
        }
    }

    async fn run_ballot_suite(deployer: impl Deployer + 'static) -> SuiteReport {
        ballot_suite(EncodedValue::expected_winner_name())
            .run(Arc::new(deployer), Arc::new(ContractVerifier::default()))
            .await
    }

    #[test]
    fn test_ballot_suite_registration() {
        let suite = ballot_suite(EncodedValue::expected_winner_name());
        assert_eq!(suite.title(), "BallotSmartContract");
        assert_eq!(suite.len(), 2);
        assert_eq!(suite.cases()[0].check, Check::Deployed);
        assert!(matches!(suite.cases()[1].check, Check::WinnerName { .. }));
    }

    #[tokio::test]
    async fn test_suite_passes_against_expected_contract() {
        let handle = StaticHandle::returning(&EncodedValue::expected_winner_name());
        let report = run_ballot_suite(StaticDeployer(Arc::new(handle))).await;

        assert!(report.is_success());
        assert_eq!(report.passed(), 2);
        assert_eq!(report.cases[0].name, "Should deploy the smart contract properly");
        assert_eq!(report.cases[1].name, "Should display the winnerName");
    }

    #[tokio::test]
    async fn test_suite_reports_mismatch() {
        let handle = StaticHandle::new(BALLOT, Ok(vec![0u8; 32]));
        let report = run_ballot_suite(StaticDeployer(Arc::new(handle))).await;

        assert!(!report.is_success());
        assert!(report.cases[0].passed());
        assert!(report.cases[1].error().is_some_and(VerifyError::is_assertion));

        let rendered = report.to_string();
        assert!(rendered.contains("1 passing, 1 failing"));
        assert!(rendered.contains("1) Should display the winnerName"));
        assert!(rendered.contains(crate::EXPECTED_WINNER_NAME));
    }

    #[tokio::test]
    async fn test_suite_reports_deployment_failure() {
        let report = run_ballot_suite(UnreachableDeployer).await;

        assert_eq!(report.failed(), 2);
        for case in &report.cases {
            assert!(case.error().is_some_and(VerifyError::is_deployment));
        }
    }

    #[tokio::test]
    async fn test_suite_bounds_handle_acquisition() {
        let report = ballot_suite(EncodedValue::expected_winner_name())
            .run(
                Arc::new(SlowDeployer(Duration::from_secs(5))),
                Arc::new(ContractVerifier::new(Duration::from_millis(50))),
            )
            .await;

        assert_eq!(report.failed(), 2);
        for case in &report.cases {
            assert!(
                matches!(
                    case.error(),
                    Some(VerifyError::Deployment(DeploymentError::Timeout { operation, .. }))
                        if operation == "deployed()"
                ),
                "{}: {:?}",
                case.name,
                case.error()
            );
        }
    }

    #[tokio::test]
    async fn test_empty_suite() {
        let report = Suite::new("empty")
            .run(Arc::new(UnreachableDeployer), Arc::new(ContractVerifier::default()))
            .await;
        assert!(report.is_success());
        assert!(report.cases.is_empty());
    }
}
