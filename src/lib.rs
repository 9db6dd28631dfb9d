//! Storefront E2E Test Framework
//!
//! This crate provides a Rust-controlled E2E smoke-testing framework that:
//! - Probes an externally deployed storefront for reachability
//! - Controls Playwright by generating and running Node scripts
//! - Parses declarative YAML test specs
//! - Writes machine-readable suite results as JSON
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    E2E Test Runner (Rust)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── probe_store() -> StoreTarget                         │
//! │    ├── run_spec(spec: TestSpec) -> TestResult               │
//! │    └── write_results(TestSuiteResult) -> JSON               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestSpec (YAML)                                            │
//! │    ├── name, description, tags                              │
//! │    └── steps: [Step]                                        │
//! │          ├── navigate { url }                               │
//! │          ├── assert_title { pattern }                       │
//! │          ├── assert { selector, visible?, text?, count? }   │
//! │          ├── wait { selector, timeout_ms }                  │
//! │          └── sleep / log                                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The storefront itself is never spawned by this crate; tests run against
//! whatever deployment the configured base URL points at.

pub mod error;
pub mod playwright;
pub mod runner;
pub mod spec;
pub mod store;

pub use error::{E2eError, E2eResult};
pub use runner::TestRunner;
pub use spec::{TestSpec, TestStep};
