//! # Test Harness
//!
//! Runs the built-in test suites of many calculation modules and collects
//! one report entry per requested id.
//!
//! For each id the harness resolves the module through the [`Registry`],
//! runs its named assertions and (by default) its smoke test, and records
//! either the results or the error. A module that fails to resolve,
//! returns `Err`, or panics only produces an error entry; the batch always
//! runs to completion.
//!
//! Entries come back in input order in both execution modes. Parallel mode
//! uses rayon's indexed collect, which writes each result to its own slot.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "run_id": "1d6f0c3e-5f5b-4d53-9a6c-9a8a7c1f2b11",
//!   "generated_at": "2026-10-16T09:30:00Z",
//!   "mode": "sequential",
//!   "passed": 4,
//!   "failed": 1,
//!   "entries": [
//!     { "calculation_id": "velocity_in_pipelines",
//!       "results": [{ "name": "Returns table", "pass": true }] },
//!     { "calculation_id": "missing_module", "error": "Unknown calculation: missing_module" }
//!   ]
//! }
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculations::TestCaseResult;
use crate::errors::CalcResult;
use crate::manifest::Manifest;
use crate::registry::Registry;

/// Name of the assertion the harness appends for a module's smoke test
pub const SMOKE_TEST_NAME: &str = "smoke test";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Sequential,
    Parallel,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Sequential => write!(f, "sequential"),
            ExecutionMode::Parallel => write!(f, "parallel"),
        }
    }
}

/// Harness settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub mode: ExecutionMode,
    /// Append each module's smoke test as an extra assertion
    pub include_smoke: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Sequential,
            include_smoke: true,
        }
    }
}

/// Outcome for one requested calculation id. Exactly one of `results` and
/// `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReportEntry {
    pub calculation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<TestCaseResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestReportEntry {
    pub fn completed(calculation_id: impl Into<String>, results: Vec<TestCaseResult>) -> Self {
        Self {
            calculation_id: calculation_id.into(),
            results: Some(results),
            error: None,
        }
    }

    pub fn errored(calculation_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            calculation_id: calculation_id.into(),
            results: None,
            error: Some(error.into()),
        }
    }

    /// True when the suite ran and every assertion passed
    pub fn passed(&self) -> bool {
        self.error.is_none()
            && self
                .results
                .as_ref()
                .is_some_and(|results| results.iter().all(|r| r.pass))
    }
}

/// Aggregated report for one harness run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub mode: ExecutionMode,
    /// Assertions that passed
    pub passed: usize,
    /// Assertions that failed plus entries that errored
    pub failed: usize,
    pub entries: Vec<TestReportEntry>,
}

impl TestReport {
    pub fn new(mode: ExecutionMode, entries: Vec<TestReportEntry>) -> Self {
        let mut passed = 0;
        let mut failed = 0;
        for entry in &entries {
            match &entry.results {
                Some(results) => {
                    let ok = results.iter().filter(|r| r.pass).count();
                    passed += ok;
                    failed += results.len() - ok;
                }
                None => failed += 1,
            }
        }
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            mode,
            passed,
            failed,
            entries,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn entry(&self, calculation_id: &str) -> Option<&TestReportEntry> {
        self.entries.iter().find(|e| e.calculation_id == calculation_id)
    }

    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs module test suites through a registry.
#[derive(Debug, Clone)]
pub struct TestHarness {
    registry: Arc<Registry>,
    config: HarnessConfig,
}

impl TestHarness {
    pub fn new(registry: Arc<Registry>, config: HarnessConfig) -> Self {
        Self { registry, config }
    }

    /// Harness over the process-wide registry
    pub fn global(config: HarnessConfig) -> Self {
        Self::new(Registry::global(), config)
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Run the suites for `ids`, one entry per id, in order.
    pub fn run<S: AsRef<str> + Sync>(&self, ids: &[S]) -> TestReport {
        let entries: Vec<TestReportEntry> = match self.config.mode {
            ExecutionMode::Sequential => ids.iter().map(|id| self.evaluate(id.as_ref())).collect(),
            ExecutionMode::Parallel => ids.par_iter().map(|id| self.evaluate(id.as_ref())).collect(),
        };
        let report = TestReport::new(self.config.mode, entries);
        info!(
            run_id = %report.run_id,
            mode = %report.mode,
            passed = report.passed,
            failed = report.failed,
            "test run complete"
        );
        report
    }

    pub fn run_manifest(&self, manifest: &Manifest) -> TestReport {
        self.run(&manifest.calculation_ids())
    }

    /// Run every calculation the registry knows
    pub fn run_all(&self) -> TestReport {
        self.run_manifest(&self.registry.manifest())
    }

    /// Evaluate one id, converting errors and panics into an error entry.
    pub fn evaluate(&self, id: &str) -> TestReportEntry {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_suite(id)));
        match outcome {
            Ok(Ok(results)) => {
                let failing: Vec<&str> = results
                    .iter()
                    .filter(|r| !r.pass)
                    .map(|r| r.name.as_str())
                    .collect();
                if failing.is_empty() {
                    info!(calculation = id, assertions = results.len(), "suite passed");
                } else {
                    warn!(calculation = id, failing = ?failing, "suite has failing assertions");
                }
                TestReportEntry::completed(id, results)
            }
            Ok(Err(err)) => {
                warn!(calculation = id, error = %err, "suite errored");
                TestReportEntry::errored(id, err.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(calculation = id, panic = %message, "suite panicked");
                TestReportEntry::errored(id, format!("panic: {}", message))
            }
        }
    }

    fn run_suite(&self, id: &str) -> CalcResult<Vec<TestCaseResult>> {
        let module = self.registry.get(id)?;
        let mut results = module.run_tests()?;
        if self.config.include_smoke {
            results.push(TestCaseResult {
                name: SMOKE_TEST_NAME.to_string(),
                pass: module.smoke_test(),
            });
        }
        Ok(results)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn harness(mode: ExecutionMode) -> TestHarness {
        TestHarness::new(
            Arc::new(Registry::builtin()),
            HarnessConfig {
                mode,
                include_smoke: true,
            },
        )
    }

    #[test]
    fn test_builtin_suites_pass() {
        let report = harness(ExecutionMode::Sequential).run_all();
        assert_eq!(report.entries.len(), 6);
        assert!(report.is_success(), "{:#?}", report.entries);
        for entry in &report.entries {
            let results = entry.results.as_ref().unwrap();
            assert_eq!(results.last().unwrap().name, SMOKE_TEST_NAME);
        }
    }

    #[test]
    fn test_unknown_id_recorded_in_place() {
        let ids = ["velocity_in_pipelines", "nope", "pipe_mass"];
        let report = harness(ExecutionMode::Sequential).run(&ids);
        let order: Vec<&str> = report.entries.iter().map(|e| e.calculation_id.as_str()).collect();
        assert_eq!(order, ids);
        assert_eq!(
            report.entries[1].error.as_deref(),
            Some("Unknown calculation: nope")
        );
        assert!(report.entries[2].passed());
        assert_eq!(report.failed, 1);
        assert!(!report.is_success());
    }

    #[test]
    fn test_smoke_can_be_skipped() {
        let harness = TestHarness::new(
            Arc::new(Registry::builtin()),
            HarnessConfig {
                mode: ExecutionMode::Sequential,
                include_smoke: false,
            },
        );
        let entry = harness.evaluate("gas_calorific_value");
        assert!(entry
            .results
            .unwrap()
            .iter()
            .all(|r| r.name != SMOKE_TEST_NAME));
    }

    #[test]
    fn test_config_defaults_from_json() {
        let config: HarnessConfig = serde_json::from_str(r#"{ "mode": "parallel" }"#).unwrap();
        assert_eq!(config.mode, ExecutionMode::Parallel);
        assert!(config.include_smoke);
    }

    #[test]
    fn test_report_json_shape() {
        let report = harness(ExecutionMode::Sequential).run(&["nope"]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "sequential");
        assert_eq!(json["entries"][0]["calculation_id"], "nope");
        assert!(json["entries"][0].get("results").is_none());
        assert!(json["run_id"].is_string());
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
    }
}
