//! Scenario and step types
//!
//! A [`Scenario`] is an ordered, named sequence of immutable [`Step`]s
//! representing one test case. Scenarios are built either from YAML
//! files (see [`super::file`]) or in code through the fluent builder
//! methods on [`Scenario`].

use std::fmt;

use crate::locator::Locator;

/// An ordered, named sequence of interaction/assertion steps
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Human-readable name, surfaced in reports and failures
    pub name: String,
    /// Optional description of what the scenario verifies
    pub description: Option<String>,
    /// Base URL that relative `Navigate` targets resolve against
    pub base_url: Option<String>,
    /// The steps, executed strictly in declared order
    pub steps: Vec<Step>,
}

/// A single navigate/fill/click/wait/extract/assert action
#[derive(Debug, Clone)]
pub enum Step {
    /// Load a URL (absolute, or relative to the scenario base URL)
    Navigate {
        /// Target URL
        url: String,
    },
    /// Set the value of form elements, in declared order
    Fill {
        /// (target, value) pairs; each target must match exactly one element
        fields: Vec<(Locator, String)>,
    },
    /// Click the first element resolved by the locator
    Click {
        /// Target element
        target: Locator,
    },
    /// Suspend until the page reports a new document loaded
    WaitForNavigation,
    /// Evaluate a read-only query and store the result as the
    /// scenario's last extracted value
    Extract {
        /// What to read from the document
        extraction: Extraction,
    },
    /// Compare the last extracted value against an expectation
    Assert {
        /// Expected pattern
        expect: Expectation,
    },
}

impl Step {
    /// The kind tag of this step, for reports and error context
    pub fn kind(&self) -> StepKind {
        match self {
            Self::Navigate { .. } => StepKind::Navigate,
            Self::Fill { .. } => StepKind::Fill,
            Self::Click { .. } => StepKind::Click,
            Self::WaitForNavigation => StepKind::WaitForNavigation,
            Self::Extract { .. } => StepKind::Extract,
            Self::Assert { .. } => StepKind::Assert,
        }
    }
}

/// Kind tag for a step, used in failure context and step reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Navigate,
    Fill,
    Click,
    WaitForNavigation,
    Extract,
    Assert,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Navigate => "navigate",
            Self::Fill => "fill",
            Self::Click => "click",
            Self::WaitForNavigation => "wait_for_navigation",
            Self::Extract => "extract",
            Self::Assert => "assert",
        };
        f.write_str(name)
    }
}

/// A read-only query against the current document
#[derive(Debug, Clone)]
pub enum Extraction {
    /// Visible text of the single element matching the locator
    Text(Locator),
    /// Visible text of every element matching the locator
    Texts(Locator),
    /// Text of the sibling following the child whose text equals
    /// `label`, within the parent of the element matching `heading`
    LabelSibling {
        /// Selector for the anchor element whose parent holds the pairs
        heading: String,
        /// Exact label text to look up
        label: String,
    },
    /// Raw JavaScript expression evaluated against the live document
    Script(String),
}

/// The accumulator value produced by an extract step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    /// A single string value
    Text(String),
    /// An ordered list of string values
    List(Vec<String>),
}

impl Extracted {
    /// Textual form used for assertions; lists join with newlines so
    /// substring expectations work across multi-element extractions
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::List(items) => items.join("\n"),
        }
    }
}

/// Expected pattern for an assert step
///
/// At least one of the two checks must be set; both may be.
#[derive(Debug, Clone, Default)]
pub struct Expectation {
    /// Exact match against the extracted text
    pub equals: Option<String>,
    /// Substring match against the extracted text
    pub contains: Option<String>,
}

impl Expectation {
    /// Check the expectation against an actual value
    ///
    /// Returns the description of the first unmet check, or `None` when
    /// the expectation holds.
    pub fn unmet_by(&self, actual: &str) -> Option<String> {
        if let Some(expected) = &self.equals {
            if actual != expected {
                return Some(format!("'{expected}'"));
            }
        }
        if let Some(expected) = &self.contains {
            if !actual.contains(expected.as_str()) {
                return Some(format!("text containing '{expected}'"));
            }
        }
        None
    }

    /// Whether the expectation performs any check at all
    pub fn is_empty(&self) -> bool {
        self.equals.is_none() && self.contains.is_none()
    }
}

impl Scenario {
    /// Create an empty scenario
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            base_url: None,
            steps: Vec::new(),
        }
    }

    /// Set the base URL that relative navigations resolve against
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Append a navigate step
    pub fn navigate(mut self, url: impl Into<String>) -> Self {
        self.steps.push(Step::Navigate { url: url.into() });
        self
    }

    /// Append a fill step over CSS selector targets
    pub fn fill<S, V, I>(mut self, fields: I) -> Self
    where
        S: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (S, V)>,
    {
        self.steps.push(Step::Fill {
            fields: fields
                .into_iter()
                .map(|(sel, value)| (Locator::css(sel), value.into()))
                .collect(),
        });
        self
    }

    /// Append a click step
    pub fn click(mut self, target: Locator) -> Self {
        self.steps.push(Step::Click { target });
        self
    }

    /// Append a wait-for-navigation step
    pub fn wait_for_navigation(mut self) -> Self {
        self.steps.push(Step::WaitForNavigation);
        self
    }

    /// Append an extract step reading the text of a single element
    pub fn extract_text(mut self, target: Locator) -> Self {
        self.steps.push(Step::Extract {
            extraction: Extraction::Text(target),
        });
        self
    }

    /// Append an extract step reading the texts of all matching elements
    pub fn extract_texts(mut self, target: Locator) -> Self {
        self.steps.push(Step::Extract {
            extraction: Extraction::Texts(target),
        });
        self
    }

    /// Append an extract step reading a label's following sibling
    pub fn extract_label_sibling(
        mut self,
        heading: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        self.steps.push(Step::Extract {
            extraction: Extraction::LabelSibling {
                heading: heading.into(),
                label: label.into(),
            },
        });
        self
    }

    /// Append an assert step requiring an exact match
    pub fn assert_equals(mut self, expected: impl Into<String>) -> Self {
        self.steps.push(Step::Assert {
            expect: Expectation {
                equals: Some(expected.into()),
                contains: None,
            },
        });
        self
    }

    /// Append an assert step requiring a substring match
    pub fn assert_contains(mut self, expected: impl Into<String>) -> Self {
        self.steps.push(Step::Assert {
            expect: Expectation {
                equals: None,
                contains: Some(expected.into()),
            },
        });
        self
    }

    /// Validate structural invariants before execution
    ///
    /// Rejects empty scenarios and assert steps with no extract before
    /// them; both would otherwise only fail at runtime.
    pub fn validate(&self) -> crate::Result<()> {
        if self.steps.is_empty() {
            return Err(crate::Error::Config(format!(
                "scenario '{}' has no steps",
                self.name
            )));
        }
        let mut extracted = false;
        for (index, step) in self.steps.iter().enumerate() {
            match step {
                Step::Extract { .. } => extracted = true,
                Step::Assert { expect } => {
                    if !extracted {
                        return Err(crate::Error::Config(format!(
                            "scenario '{}': assert at step {index} has no preceding extract",
                            self.name
                        )));
                    }
                    if expect.is_empty() {
                        return Err(crate::Error::Config(format!(
                            "scenario '{}': assert at step {index} checks nothing",
                            self.name
                        )));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_step_order() {
        let scenario = Scenario::new("sign in")
            .navigate("/login")
            .fill([("#username", "helenkeller"), ("#password", "helloworld")])
            .click(Locator::css(".santa-button"))
            .wait_for_navigation()
            .extract_text(Locator::css(".dropdown-toggle"))
            .assert_contains("@helenkeller");

        let kinds: Vec<StepKind> = scenario.steps.iter().map(Step::kind).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::Navigate,
                StepKind::Fill,
                StepKind::Click,
                StepKind::WaitForNavigation,
                StepKind::Extract,
                StepKind::Assert,
            ]
        );
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn assert_without_extract_is_rejected() {
        let scenario = Scenario::new("bad").navigate("/").assert_contains("x");
        let err = scenario.validate().unwrap_err();
        assert!(err.to_string().contains("no preceding extract"));
    }

    #[test]
    fn empty_scenario_is_rejected() {
        assert!(Scenario::new("empty").validate().is_err());
    }

    #[test]
    fn expectation_checks() {
        let expect = Expectation {
            equals: None,
            contains: Some("@helenkeller".to_string()),
        };
        assert!(expect.unmet_by("signed in as @helenkeller").is_none());
        assert!(expect.unmet_by("@wronguser").is_some());

        let exact = Expectation {
            equals: Some("10".to_string()),
            contains: None,
        };
        assert!(exact.unmet_by("10").is_none());
        assert!(exact.unmet_by("100").is_some());
    }

    #[test]
    fn list_extraction_joins_for_assertions() {
        let value = Extracted::List(vec!["Edit".to_string(), "Save".to_string()]);
        assert_eq!(value.as_text(), "Edit\nSave");
    }
}
