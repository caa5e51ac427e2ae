//! YAML scenario file loading
//!
//! Defines the data structures for deserializing YAML scenarios and
//! their conversion into the runtime [`Scenario`] type. Example:
//!
//! ```yaml
//! name: sign in then verify identity
//! target:
//!   base_url: http://localhost:9000
//! steps:
//!   - action: navigate
//!     url: /login
//!   - action: fill
//!     fields:
//!       "#username": helenkeller
//!       "#password": helloworld
//!   - action: click
//!     selector: button.santa-button
//!   - action: wait_for_navigation
//!   - action: extract
//!     text: .nav-link.dropdown-toggle
//!   - action: assert
//!     contains: "@helenkeller"
//! ```

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

use crate::common::{Error, Result};
use crate::locator::Locator;

use super::types::{Expectation, Extraction, Scenario, Step};

/// A complete scenario loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct ScenarioFile {
    /// Name of the scenario
    pub name: String,
    /// Optional description of what the scenario verifies
    pub description: Option<String>,
    /// Configuration for the target application
    #[serde(default)]
    pub target: TargetConfig,
    /// The sequence of steps to execute
    pub steps: Vec<StepSpec>,
}

/// Configuration for the application under test
#[derive(Deserialize, Debug, Default)]
pub struct TargetConfig {
    /// Base URL that relative navigation targets resolve against
    pub base_url: Option<String>,
}

/// A single step in a scenario file
#[derive(Deserialize, Debug)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepSpec {
    /// Load a URL
    Navigate {
        /// Target URL, absolute or relative to `target.base_url`
        url: String,
    },
    /// Set form element values
    Fill {
        /// Selector-to-value map, applied in declared order
        fields: IndexMap<String, String>,
    },
    /// Click an element, located by selector or by exact visible text
    Click {
        /// CSS selector target
        selector: Option<String>,
        /// Exact visible text target
        text: Option<String>,
        /// Candidate selector for text matching (default: `button`)
        within: Option<String>,
    },
    /// Wait for a new document to load
    WaitForNavigation,
    /// Read a value from the document into the accumulator
    Extract {
        /// Text of the single element matching this selector
        text: Option<String>,
        /// Texts of every element matching this selector
        texts: Option<String>,
        /// Label whose following sibling holds the value
        label: Option<String>,
        /// Anchor selector for label lookup (default: `h2`)
        heading: Option<String>,
        /// Raw read-only JavaScript expression
        script: Option<String>,
    },
    /// Compare the accumulator against an expectation
    Assert {
        /// Exact expected value
        equals: Option<String>,
        /// Expected substring
        contains: Option<String>,
    },
}

impl ScenarioFile {
    /// Parse a scenario from YAML text
    pub fn from_yaml(path: &str, content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::scenario_parse(path, e.to_string()))
    }

    /// Convert into the runtime scenario, validating step shapes
    pub fn into_scenario(self, path: &str) -> Result<Scenario> {
        let mut steps = Vec::with_capacity(self.steps.len());
        for (index, spec) in self.steps.into_iter().enumerate() {
            steps.push(spec.into_step().map_err(|reason| {
                Error::scenario_parse(path, format!("step {index}: {reason}"))
            })?);
        }

        let scenario = Scenario {
            name: self.name,
            description: self.description,
            base_url: self.target.base_url,
            steps,
        };
        scenario.validate()?;
        Ok(scenario)
    }
}

impl StepSpec {
    /// Convert a declarative step into its runtime form
    ///
    /// Errors are plain strings here; the caller attaches file and step
    /// context.
    fn into_step(self) -> std::result::Result<Step, String> {
        match self {
            Self::Navigate { url } => Ok(Step::Navigate { url }),
            Self::Fill { fields } => {
                if fields.is_empty() {
                    return Err("fill step has no fields".to_string());
                }
                Ok(Step::Fill {
                    fields: fields
                        .into_iter()
                        .map(|(selector, value)| (Locator::css(selector), value))
                        .collect(),
                })
            }
            Self::Click {
                selector,
                text,
                within,
            } => {
                let target = match (selector, text) {
                    (Some(css), None) => {
                        if within.is_some() {
                            return Err(
                                "'within' only applies to text targets".to_string()
                            );
                        }
                        Locator::css(css)
                    }
                    (None, Some(text)) => {
                        Locator::text(within.unwrap_or_else(|| "button".to_string()), text)
                    }
                    (Some(_), Some(_)) => {
                        return Err(
                            "click step takes either 'selector' or 'text', not both".to_string()
                        )
                    }
                    (None, None) => {
                        return Err("click step needs a 'selector' or 'text' target".to_string())
                    }
                };
                Ok(Step::Click { target })
            }
            Self::WaitForNavigation => Ok(Step::WaitForNavigation),
            Self::Extract {
                text,
                texts,
                label,
                heading,
                script,
            } => {
                let sources =
                    usize::from(text.is_some()) + usize::from(texts.is_some())
                        + usize::from(label.is_some())
                        + usize::from(script.is_some());
                if sources != 1 {
                    return Err(
                        "extract step takes exactly one of 'text', 'texts', 'label', 'script'"
                            .to_string(),
                    );
                }
                if heading.is_some() && label.is_none() {
                    return Err("'heading' only applies to label extraction".to_string());
                }
                let extraction = if let Some(selector) = text {
                    Extraction::Text(Locator::css(selector))
                } else if let Some(selector) = texts {
                    Extraction::Texts(Locator::css(selector))
                } else if let Some(label) = label {
                    Extraction::LabelSibling {
                        heading: heading.unwrap_or_else(|| "h2".to_string()),
                        label,
                    }
                } else {
                    // Validated above: 'script' is the remaining source.
                    Extraction::Script(script.unwrap_or_default())
                };
                Ok(Step::Extract { extraction })
            }
            Self::Assert { equals, contains } => {
                let expect = Expectation { equals, contains };
                if expect.is_empty() {
                    return Err(
                        "assert step needs at least one of 'equals' or 'contains'".to_string()
                    );
                }
                Ok(Step::Assert { expect })
            }
        }
    }
}

/// Load and validate a scenario from a YAML file on disk
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: display.clone(),
        error: e.to_string(),
    })?;
    ScenarioFile::from_yaml(&display, &content)?.into_scenario(&display)
}
