//! Scenario execution
//!
//! Drives a [`Page`] through a scenario's steps in declared order: a
//! sequential fold with a "last extracted value" accumulator consumed by
//! assert steps. Execution is fail-fast; the first failing step aborts
//! the scenario and propagates with the step index and kind attached.
//! No step is retried. The only special-cased wait is the explicit
//! wait-for-navigation step, a bounded blocking wait.

use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use serde_json::Value;
use tokio::time::timeout;
use tracing::debug;
use url::Url;

use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::page::Page;

use super::file::load_scenario;
use super::types::{Expectation, Extracted, Extraction, Scenario, Step};

/// Executes scenarios against a borrowed page
pub struct ScenarioRunner {
    navigation_timeout: Duration,
    report: bool,
}

impl ScenarioRunner {
    /// Create a runner with the given navigation timeout
    pub fn new(navigation_timeout: Duration) -> Self {
        Self {
            navigation_timeout,
            report: false,
        }
    }

    /// Create a runner from the loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.timeouts.navigation())
    }

    /// Print a colored per-step report to stdout while running
    pub fn with_report(mut self, report: bool) -> Self {
        self.report = report;
        self
    }

    /// Execute each step of the scenario in order
    ///
    /// The page is borrowed for the scenario's duration. On failure the
    /// error carries the index and kind of the step that failed.
    pub async fn run(&self, scenario: &Scenario, page: &mut dyn Page) -> Result<()> {
        scenario.validate()?;

        let mut last: Option<Extracted> = None;
        for (index, step) in scenario.steps.iter().enumerate() {
            debug!("step {index} ({})", step.kind());
            self.execute_step(scenario, step, page, &mut last)
                .await
                .map_err(|e| e.at_step(index, step.kind()))?;
            if self.report {
                println!(
                    "  {} Step {}: {}",
                    "✓".green(),
                    index + 1,
                    describe(step).dimmed()
                );
            }
        }
        Ok(())
    }

    async fn execute_step(
        &self,
        scenario: &Scenario,
        step: &Step,
        page: &mut dyn Page,
        last: &mut Option<Extracted>,
    ) -> Result<()> {
        match step {
            Step::Navigate { url } => {
                let target = resolve_url(scenario.base_url.as_deref(), url)?;
                match timeout(self.navigation_timeout, page.goto(&target)).await {
                    Ok(result) => result,
                    Err(_) => Err(Error::navigation(
                        &target,
                        format!(
                            "load did not complete within {}s",
                            self.navigation_timeout.as_secs()
                        ),
                    )),
                }
            }
            Step::Fill { fields } => {
                for (target, value) in fields {
                    require_one(page, target).await?;
                    page.set_value(target, value).await?;
                }
                Ok(())
            }
            Step::Click { target } => {
                if page.count(target).await? == 0 {
                    return Err(Error::ElementNotFound(target.to_string()));
                }
                page.click(target).await
            }
            Step::WaitForNavigation => {
                match timeout(self.navigation_timeout, page.wait_for_navigation()).await {
                    Ok(result) => result,
                    Err(_) => Err(Error::Timeout(self.navigation_timeout.as_secs())),
                }
            }
            Step::Extract { extraction } => {
                *last = Some(self.extract(extraction, page).await?);
                Ok(())
            }
            Step::Assert { expect } => {
                let value = last.as_ref().ok_or(Error::NothingExtracted)?;
                check(expect, value)
            }
        }
    }

    async fn extract(&self, extraction: &Extraction, page: &mut dyn Page) -> Result<Extracted> {
        match extraction {
            Extraction::Text(target) => {
                require_one(page, target).await?;
                page.text(target)
                    .await?
                    .map(Extracted::Text)
                    .ok_or_else(|| Error::ElementNotFound(target.to_string()))
            }
            Extraction::Texts(target) => page.texts(target).await.map(Extracted::List),
            Extraction::LabelSibling { heading, label } => page
                .label_sibling(heading, label)
                .await?
                .map(Extracted::Text)
                .ok_or_else(|| {
                    Error::ElementNotFound(format!("value following label '{label}'"))
                }),
            Extraction::Script(script) => {
                let value = page.evaluate(script).await?;
                extracted_from_value(value)
            }
        }
    }
}

/// Fail unless the locator resolves to exactly one element
async fn require_one(page: &mut dyn Page, target: &crate::locator::Locator) -> Result<()> {
    match page.count(target).await? {
        0 => Err(Error::ElementNotFound(target.to_string())),
        1 => Ok(()),
        count => Err(Error::AmbiguousSelector {
            locator: target.to_string(),
            count,
        }),
    }
}

fn check(expect: &Expectation, value: &Extracted) -> Result<()> {
    let actual = value.as_text();
    match expect.unmet_by(&actual) {
        None => Ok(()),
        Some(expected) => Err(Error::Assertion { expected, actual }),
    }
}

fn extracted_from_value(value: Value) -> Result<Extracted> {
    match value {
        Value::String(s) => Ok(Extracted::Text(s)),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(Error::Evaluation(format!(
                    "expected a string element, got {other}"
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Extracted::List),
        Value::Number(n) => Ok(Extracted::Text(n.to_string())),
        Value::Bool(b) => Ok(Extracted::Text(b.to_string())),
        other => Err(Error::Evaluation(format!(
            "extract script returned {other}"
        ))),
    }
}

fn resolve_url(base: Option<&str>, url: &str) -> Result<String> {
    match Url::parse(url) {
        Ok(parsed) => Ok(parsed.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = base.ok_or_else(|| {
                Error::Config(format!(
                    "relative url '{url}' requires a base_url in the scenario target"
                ))
            })?;
            let parsed_base = Url::parse(base)
                .map_err(|e| Error::Config(format!("invalid base_url '{base}': {e}")))?;
            parsed_base
                .join(url)
                .map(|joined| joined.to_string())
                .map_err(|e| Error::Config(format!("cannot join '{url}' to '{base}': {e}")))
        }
        Err(e) => Err(Error::Config(format!("invalid url '{url}': {e}"))),
    }
}

fn describe(step: &Step) -> String {
    match step {
        Step::Navigate { url } => format!("navigate {url}"),
        Step::Fill { fields } => {
            let targets: Vec<String> = fields.iter().map(|(t, _)| t.to_string()).collect();
            format!("fill {}", targets.join(", "))
        }
        Step::Click { target } => format!("click {target}"),
        Step::WaitForNavigation => "wait for navigation".to_string(),
        Step::Extract { .. } => "extract".to_string(),
        Step::Assert { expect } => match (&expect.equals, &expect.contains) {
            (Some(e), _) => format!("assert equals '{e}'"),
            (None, Some(c)) => format!("assert contains '{c}'"),
            (None, None) => "assert".to_string(),
        },
    }
}

/// Result of running one scenario file
#[derive(Debug)]
pub struct RunReport {
    /// Scenario name
    pub name: String,
    /// Whether every step passed
    pub passed: bool,
    /// Steps completed before stopping
    pub steps_run: usize,
    /// Total steps in the scenario
    pub steps_total: usize,
    /// Failure message, when not passed
    pub error: Option<String>,
}

/// Run a scenario from a YAML file, printing a colored report
pub async fn run_file(
    path: &Path,
    page: &mut dyn Page,
    runner: &ScenarioRunner,
) -> Result<RunReport> {
    let scenario = load_scenario(path)?;
    let steps_total = scenario.steps.len();

    println!(
        "\n{} {}",
        "Running Scenario:".blue().bold(),
        scenario.name.white().bold()
    );
    if let Some(desc) = &scenario.description {
        println!("  {}", desc.dimmed());
    }

    match runner.run(&scenario, page).await {
        Ok(()) => {
            println!("{} {}", "✓".green().bold(), "Scenario Passed".green().bold());
            Ok(RunReport {
                name: scenario.name,
                passed: true,
                steps_run: steps_total,
                steps_total,
                error: None,
            })
        }
        Err(e) => {
            let steps_run = match &e {
                Error::Step { index, .. } => *index,
                _ => 0,
            };
            println!("  {} {}", "✗".red(), e);
            Ok(RunReport {
                name: scenario.name,
                passed: false,
                steps_run,
                steps_total,
                error: Some(e.to_string()),
            })
        }
    }
}
