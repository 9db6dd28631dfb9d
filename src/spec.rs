//! Declarative YAML test specification

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{E2eError, E2eResult};

/// A complete test specification parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSpec {
    /// Unique name for this test
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering tests
    #[serde(default)]
    pub tags: Vec<String>,

    /// Viewport size for the browser
    #[serde(default = "default_viewport")]
    pub viewport: Viewport,

    /// Steps to execute in order
    pub steps: Vec<TestStep>,
}

fn default_viewport() -> Viewport {
    Viewport { width: 1280, height: 720 }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// A single step in a test
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TestStep {
    /// Navigate to a URL (relative to the storefront base)
    Navigate {
        url: String,
        #[serde(default)]
        wait_for_selector: Option<String>,
    },

    /// Assert the page title matches a regex pattern
    AssertTitle {
        pattern: String,
        #[serde(default = "default_true")]
        case_insensitive: bool,
    },

    /// Assert something about an element
    Assert {
        selector: String,
        #[serde(default)]
        visible: Option<bool>,
        #[serde(default)]
        text_contains: Option<String>,
        #[serde(default)]
        count: Option<usize>,
    },

    /// Wait for an element to reach a state
    Wait {
        selector: String,
        #[serde(default = "default_wait_timeout")]
        timeout_ms: u64,
        #[serde(default)]
        state: WaitState,
    },

    /// Wait for a fixed amount of time (use sparingly)
    Sleep {
        ms: u64,
    },

    /// Log a message (for debugging)
    Log {
        message: String,
    },
}

fn default_true() -> bool {
    true
}

fn default_wait_timeout() -> u64 {
    5000 // 5 seconds default
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

impl TestSpec {
    /// Parse a test spec from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let spec: Self = serde_yaml::from_str(yaml)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Parse a test spec from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load all test specs from a directory
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        let mut specs = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            let spec = Self::from_file(entry.path())?;
            specs.push(spec);
        }

        Ok(specs)
    }

    /// Filter specs by tag
    pub fn filter_by_tag<'a>(specs: &'a [Self], tag: &str) -> Vec<&'a Self> {
        specs.iter().filter(|s| s.tags.contains(&tag.to_string())).collect()
    }

    /// Check structural invariants: non-empty step list, relative navigation
    /// paths, compilable title patterns.
    pub fn validate(&self) -> E2eResult<()> {
        if self.name.is_empty() {
            return Err(self.invalid("spec name is empty"));
        }
        if self.steps.is_empty() {
            return Err(self.invalid("spec has no steps"));
        }

        for step in &self.steps {
            match step {
                TestStep::Navigate { url, .. } => {
                    if !url.starts_with('/') {
                        return Err(self.invalid(&format!(
                            "navigate url must be a relative path starting with '/': {}",
                            url
                        )));
                    }
                }
                TestStep::AssertTitle { pattern, .. } => {
                    if let Err(e) = regex::Regex::new(pattern) {
                        return Err(self.invalid(&format!(
                            "title pattern does not compile: {}",
                            e
                        )));
                    }
                }
                TestStep::Assert { selector, visible, text_contains, count } => {
                    if selector.is_empty() {
                        return Err(self.invalid("assert selector is empty"));
                    }
                    if visible.is_none() && text_contains.is_none() && count.is_none() {
                        return Err(self.invalid(&format!(
                            "assert on '{}' checks nothing",
                            selector
                        )));
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn invalid(&self, reason: &str) -> E2eError {
        E2eError::InvalidSpec {
            spec: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}
