//! Playwright browser automation
//!
//! A spec's steps are compiled into one Node script using the plain
//! `playwright` library API and executed in a single browser session, so
//! page state carries across the steps of a spec. The script reports its
//! outcome as a single JSON line on stdout.

use std::process::{Command, Stdio};
use serde::{Deserialize, Serialize};
use tokio::process::Command as TokioCommand;
use tracing::debug;

use crate::error::{E2eError, E2eResult};
use crate::spec::{TestStep, WaitState};

/// Playwright browser handle
pub struct PlaywrightHandle {
    /// Base URL of the storefront
    base_url: String,

    /// Viewport dimensions
    viewport_width: u32,
    viewport_height: u32,

    /// Browser type
    browser: Browser,

    /// Headless mode
    headless: bool,

    /// Default timeout applied to page operations
    default_timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

impl std::str::FromStr for Browser {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chromium" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" => Ok(Browser::Webkit),
            other => Err(E2eError::Playwright(format!("unknown browser: {}", other))),
        }
    }
}

/// Result of executing a test step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub success: bool,
    pub step_name: String,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Outcome line emitted by a generated script
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptOutcome {
    pub ok: bool,
    #[serde(default)]
    pub step: Option<usize>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub completed: Vec<CompletedStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletedStep {
    pub name: String,
    pub ms: u64,
}

impl PlaywrightHandle {
    /// Create a new Playwright handle
    pub fn new(config: PlaywrightConfig) -> E2eResult<Self> {
        Self::check_playwright_installed()?;

        Ok(Self {
            base_url: config.base_url,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            browser: config.browser,
            headless: config.headless,
            default_timeout_ms: config.default_timeout_ms,
        })
    }

    /// Check if Playwright is installed
    fn check_playwright_installed() -> E2eResult<()> {
        let output = Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    /// Execute a spec's steps in one browser session
    pub async fn run_steps(&self, steps: &[TestStep]) -> E2eResult<ScriptOutcome> {
        let script = self.build_script(steps);

        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join("test.js");
        std::fs::write(&script_path, &script)?;

        debug!("Running Playwright script: {}", script_path.display());

        let output = TokioCommand::new("node")
            .arg(&script_path)
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        match parse_outcome(&stdout) {
            Some(outcome) => Ok(outcome),
            None => Err(E2eError::Playwright(format!(
                "script produced no outcome:\nstdout: {}\nstderr: {}",
                stdout.trim(),
                stderr.trim()
            ))),
        }
    }

    /// Build the Node script for a set of steps
    pub fn build_script(&self, steps: &[TestStep]) -> String {
        let mut script = String::new();

        script.push_str(&format!(
            r#"const {{ chromium, firefox, webkit }} = require('playwright');

(async () => {{
  const browser = await {browser}.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }}
  }});
  const page = await context.newPage();
  page.setDefaultTimeout({timeout});
  const baseUrl = '{base_url}';
  const completed = [];
  let step = 0;
  let t0 = 0;
  let title, text, count;

  try {{
"#,
            browser = self.browser.as_str(),
            headless = self.headless,
            width = self.viewport_width,
            height = self.viewport_height,
            timeout = self.default_timeout_ms,
            base_url = js_str(&self.base_url),
        ));

        for (i, s) in steps.iter().enumerate() {
            let name = step_name(s);
            script.push_str(&format!("\n    // step {}: {}\n", i, name));
            script.push_str(&format!("    step = {}; t0 = Date.now();\n", i));
            script.push_str(&self.step_to_js(s));
            script.push_str(&format!(
                "    completed.push({{ name: '{}', ms: Date.now() - t0 }});\n",
                js_str(&name)
            ));
        }

        script.push_str(
            r#"
    console.log(JSON.stringify({ ok: true, completed }));
  } catch (error) {
    console.log(JSON.stringify({
      ok: false,
      step,
      error: String((error && error.message) || error),
      completed
    }));
    process.exitCode = 1;
  } finally {
    await browser.close();
  }
})();
"#,
        );

        script
    }

    /// Convert a step to JavaScript code
    fn step_to_js(&self, step: &TestStep) -> String {
        match step {
            TestStep::Navigate { url, wait_for_selector } => {
                let mut js = format!("    await page.goto(baseUrl + '{}');\n", js_str(url));
                if let Some(sel) = wait_for_selector {
                    js.push_str(&format!(
                        "    await page.waitForSelector('{}');\n",
                        js_str(sel)
                    ));
                }
                js
            }
            TestStep::AssertTitle { pattern, case_insensitive } => {
                let flags = if *case_insensitive { "i" } else { "" };
                format!(
                    "    title = await page.title();\n    \
                     if (!new RegExp('{pat}', '{flags}').test(title)) {{\n      \
                     throw new Error('title \"' + title + '\" does not match {pat_note}');\n    }}\n",
                    pat = js_str(pattern),
                    flags = flags,
                    pat_note = js_str(&pattern.replace('\'', "")),
                )
            }
            TestStep::Assert { selector, visible, text_contains, count } => {
                let sel = js_str(selector);
                let mut js = String::new();

                if let Some(vis) = visible {
                    let state = if *vis { "visible" } else { "hidden" };
                    js.push_str(&format!(
                        "    await page.locator('{}').first().waitFor({{ state: '{}' }});\n",
                        sel, state
                    ));
                }

                if let Some(needle) = text_contains {
                    js.push_str(&format!(
                        "    text = await page.locator('{sel}').first().innerText();\n    \
                         if (!text.includes('{needle}')) {{\n      \
                         throw new Error('text of {sel} does not contain \"{needle}\"');\n    }}\n",
                        sel = sel,
                        needle = js_str(needle),
                    ));
                }

                if let Some(expected) = count {
                    js.push_str(&format!(
                        "    count = await page.locator('{sel}').count();\n    \
                         if (count !== {expected}) {{\n      \
                         throw new Error('expected {expected} elements matching {sel}, got ' + count);\n    }}\n",
                        sel = sel,
                        expected = expected,
                    ));
                }

                js
            }
            TestStep::Wait { selector, timeout_ms, state } => {
                let state_str = match state {
                    WaitState::Visible => "visible",
                    WaitState::Hidden => "hidden",
                    WaitState::Attached => "attached",
                    WaitState::Detached => "detached",
                };
                format!(
                    "    await page.waitForSelector('{}', {{ state: '{}', timeout: {} }});\n",
                    js_str(selector),
                    state_str,
                    timeout_ms
                )
            }
            TestStep::Sleep { ms } => {
                format!("    await page.waitForTimeout({});\n", ms)
            }
            TestStep::Log { message } => {
                // stderr so the stdout outcome line stays machine-readable
                format!("    console.error('[test] {}');\n", js_str(message))
            }
        }
    }
}

/// Short display name for a step
pub fn step_name(step: &TestStep) -> String {
    match step {
        TestStep::Navigate { url, .. } => format!("navigate:{}", url),
        TestStep::AssertTitle { pattern, .. } => format!("assert_title:{}", pattern),
        TestStep::Assert { selector, .. } => format!("assert:{}", selector),
        TestStep::Wait { selector, .. } => format!("wait:{}", selector),
        TestStep::Sleep { ms } => format!("sleep:{}ms", ms),
        TestStep::Log { message } => format!("log:{}", &message[..message.len().min(30)]),
    }
}

/// Parse the outcome line from a script's stdout
pub fn parse_outcome(stdout: &str) -> Option<ScriptOutcome> {
    stdout
        .lines()
        .rev()
        .find_map(|line| serde_json::from_str::<ScriptOutcome>(line.trim()).ok())
}

/// Escape a string for embedding in a single-quoted JS literal
fn js_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Configuration for Playwright
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub base_url: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub browser: Browser,
    pub headless: bool,
    pub default_timeout_ms: u64,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9292".to_string(),
            viewport_width: 1280,
            viewport_height: 720,
            browser: Browser::Chromium,
            headless: true,
            default_timeout_ms: 5000,
        }
    }
}
