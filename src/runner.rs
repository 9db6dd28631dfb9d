//! Main test runner that orchestrates the storefront probe and Playwright

use std::path::PathBuf;
use std::time::Instant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{E2eError, E2eResult};
use crate::playwright::{step_name, PlaywrightConfig, PlaywrightHandle, ScriptOutcome, StepResult};
use crate::spec::TestSpec;
use crate::store::{StoreConfig, StoreTarget};

/// Result of running a single test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
}

/// Result of running all tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<TestResult>,
}

/// Main E2E test runner
pub struct TestRunner {
    /// Storefront configuration
    store_config: StoreConfig,

    /// Playwright configuration
    playwright_config: PlaywrightConfig,

    /// Probed storefront target (if any)
    store: Option<StoreTarget>,

    /// Test specs directory
    specs_dir: PathBuf,

    /// Output directory for results
    output_dir: PathBuf,
}

impl TestRunner {
    /// Create a new test runner with default configuration
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    /// Create a test runner with custom configuration
    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            store_config: config.store,
            playwright_config: config.playwright,
            store: None,
            specs_dir: config.specs_dir,
            output_dir: config.output_dir,
        }
    }

    /// Probe the storefront and point Playwright at it
    pub async fn probe_store(&mut self) -> E2eResult<()> {
        if self.store.is_some() {
            return Ok(()); // Already probed
        }

        let target = StoreTarget::probe(self.store_config.clone()).await?;
        self.playwright_config.base_url = target.base_url().to_string();
        self.store = Some(target);
        Ok(())
    }

    /// Run all tests in the specs directory
    pub async fn run_all(&mut self) -> E2eResult<TestSuiteResult> {
        let specs = TestSpec::load_all(&self.specs_dir)?;
        self.run_specs(&specs).await
    }

    /// Run tests matching a tag
    pub async fn run_tagged(&mut self, tag: &str) -> E2eResult<TestSuiteResult> {
        let specs = TestSpec::load_all(&self.specs_dir)?;
        let filtered: Vec<TestSpec> = specs
            .into_iter()
            .filter(|s| s.tags.contains(&tag.to_string()))
            .collect();
        self.run_specs(&filtered).await
    }

    /// Run a specific test by name
    pub async fn run_test(&mut self, name: &str) -> E2eResult<TestResult> {
        let specs = TestSpec::load_all(&self.specs_dir)?;
        let spec = specs
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| E2eError::SpecParse(format!("Test not found: {}", name)))?;

        self.probe_store().await?;
        self.run_spec(&spec).await
    }

    /// Run a list of test specs
    pub async fn run_specs(&mut self, specs: &[TestSpec]) -> E2eResult<TestSuiteResult> {
        let start = Instant::now();
        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;
        let skipped = 0;

        // Ensure the storefront answers before driving a browser at it
        self.probe_store().await?;

        info!("Running {} test(s)...", specs.len());

        for spec in specs {
            match self.run_spec(spec).await {
                Ok(result) => {
                    if result.success {
                        passed += 1;
                        info!("✓ {} ({} ms)", result.name, result.duration_ms);
                    } else {
                        failed += 1;
                        error!("✗ {} - {}", result.name, result.error.as_deref().unwrap_or("unknown error"));
                    }
                    results.push(result);
                }
                Err(e) => {
                    failed += 1;
                    error!("✗ {} - {}", spec.name, e);
                    results.push(TestResult {
                        name: spec.name.clone(),
                        success: false,
                        duration_ms: 0,
                        steps: vec![],
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!("Test Results: {} passed, {} failed, {} skipped ({} ms)",
            passed, failed, skipped, duration_ms);

        Ok(TestSuiteResult {
            total: specs.len(),
            passed,
            failed,
            skipped,
            duration_ms,
            finished_at: Utc::now(),
            results,
        })
    }

    /// Run a single test spec
    pub async fn run_spec(&mut self, spec: &TestSpec) -> E2eResult<TestResult> {
        let start = Instant::now();
        debug!("Running test: {}", spec.name);

        // Update viewport from spec
        let mut pw_config = self.playwright_config.clone();
        pw_config.viewport_width = spec.viewport.width;
        pw_config.viewport_height = spec.viewport.height;

        let playwright = PlaywrightHandle::new(pw_config)?;
        let outcome = playwright.run_steps(&spec.steps).await?;

        let duration_ms = start.elapsed().as_millis() as u64;
        Ok(result_from_outcome(spec, outcome, duration_ms))
    }

    /// Write test results to JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

/// Fold a script outcome into a test result, attributing any failure to the
/// step the script stopped at.
fn result_from_outcome(spec: &TestSpec, outcome: ScriptOutcome, duration_ms: u64) -> TestResult {
    let mut steps: Vec<StepResult> = outcome
        .completed
        .iter()
        .map(|c| StepResult {
            success: true,
            step_name: c.name.clone(),
            duration_ms: c.ms,
            error: None,
        })
        .collect();

    let mut test_error = None;

    if !outcome.ok {
        let idx = outcome.step.unwrap_or(steps.len());
        let name = spec
            .steps
            .get(idx)
            .map(step_name)
            .unwrap_or_else(|| format!("step {}", idx));
        let reason = outcome.error.unwrap_or_else(|| "unknown error".to_string());

        test_error = Some(format!("{}: {}", name, reason));
        steps.push(StepResult {
            success: false,
            step_name: name,
            duration_ms: 0,
            error: Some(reason),
        });
    }

    TestResult {
        name: spec.name.clone(),
        success: test_error.is_none(),
        duration_ms,
        steps,
        error: test_error,
    }
}

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub store: StoreConfig,
    pub playwright: PlaywrightConfig,
    pub specs_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            playwright: PlaywrightConfig::default(),
            specs_dir: PathBuf::from("specs"),
            output_dir: PathBuf::from("test-results"),
        }
    }
}
