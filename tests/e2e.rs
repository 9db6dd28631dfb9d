//! E2E test harness entry point
//!
//! This file is the test binary that runs the storefront smoke suite from
//! YAML specs. Run with: cargo test --test e2e
//!
//! The storefront itself must already be serving at the configured base URL
//! (a local `shopify theme dev` server by default).

use std::path::PathBuf;
use std::time::Duration;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use storefront_e2e::playwright::{Browser, PlaywrightConfig};
use storefront_e2e::runner::RunnerConfig;
use storefront_e2e::store::StoreConfig;
use storefront_e2e::{E2eResult, TestRunner};

#[derive(Parser, Debug)]
#[command(name = "storefront-e2e")]
#[command(about = "E2E smoke test runner for the storefront")]
struct Args {
    /// Path to test specs directory
    #[arg(short, long, default_value = "specs")]
    specs: PathBuf,

    /// Run only tests matching this tag
    #[arg(short, long)]
    tag: Option<String>,

    /// Run only a specific test by name
    #[arg(short, long)]
    name: Option<String>,

    /// Base URL of the storefront deployment
    #[arg(long, env = "STOREFRONT_BASE_URL", default_value = "http://127.0.0.1:9292")]
    base_url: String,

    /// How long to wait for the storefront to answer, in seconds
    #[arg(long, default_value = "30")]
    probe_timeout: u64,

    /// Browser to use (chromium, firefox, webkit)
    #[arg(long, default_value = "chromium")]
    browser: Browser,

    /// Run in headless mode
    #[arg(long, default_value = "true")]
    headless: bool,

    /// Viewport width
    #[arg(long, default_value = "1280")]
    viewport_width: u32,

    /// Viewport height
    #[arg(long, default_value = "720")]
    viewport_height: u32,

    /// Default timeout for page operations, in milliseconds
    #[arg(long, default_value = "5000")]
    timeout_ms: u64,

    /// Output directory for results
    #[arg(short, long, default_value = "test-results")]
    output: PathBuf,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().expect("static directive")))
        .init();

    let args = Args::parse();

    // Run async main
    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let result = rt.block_on(async_main(args));

    match result {
        Ok(success) => {
            if success {
                std::process::exit(0);
            } else {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

async fn async_main(args: Args) -> E2eResult<bool> {
    let config = RunnerConfig {
        store: StoreConfig {
            base_url: args.base_url.clone(),
            probe_timeout: Duration::from_secs(args.probe_timeout),
            ..Default::default()
        },
        playwright: PlaywrightConfig {
            base_url: args.base_url,
            viewport_width: args.viewport_width,
            viewport_height: args.viewport_height,
            browser: args.browser,
            headless: args.headless,
            default_timeout_ms: args.timeout_ms,
        },
        specs_dir: args.specs,
        output_dir: args.output,
    };

    let mut runner = TestRunner::with_config(config);

    // Run tests
    let results = if let Some(name) = args.name {
        let result = runner.run_test(&name).await?;
        storefront_e2e::runner::TestSuiteResult {
            total: 1,
            passed: if result.success { 1 } else { 0 },
            failed: if result.success { 0 } else { 1 },
            skipped: 0,
            duration_ms: result.duration_ms,
            finished_at: chrono::Utc::now(),
            results: vec![result],
        }
    } else if let Some(tag) = args.tag {
        runner.run_tagged(&tag).await?
    } else {
        runner.run_all().await?
    };

    // Write results
    runner.write_results(&results)?;

    Ok(results.failed == 0)
}
