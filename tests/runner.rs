//! Runner integration tests
//!
//! Exercise the scenario runner against an instrumented in-memory page
//! that records every call, so step ordering and fail-fast behavior can
//! be asserted directly, without a browser.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use webharness::locator::Locator;
use webharness::page::Page;
use webharness::scenario::{Scenario, ScenarioRunner, StepKind};
use webharness::{Error, Result};

/// One element of a mock document
#[derive(Clone)]
struct MockElement {
    /// Selector strings this element answers to
    selectors: Vec<&'static str>,
    /// Visible text
    text: &'static str,
    /// Document key a click transitions to, if any
    navigates_to: Option<&'static str>,
}

/// Value shown after a "Label" entry in a mock document
#[derive(Clone)]
enum LabelValue {
    Static(&'static str),
    /// Reads whatever was last filled into the given selector
    FromInput(&'static str),
}

#[derive(Clone, Default)]
struct MockDoc {
    elements: Vec<MockElement>,
    labeled: Vec<(&'static str, LabelValue)>,
}

/// Instrumented page: a set of documents keyed by URL path, with
/// scripted navigations and a call log
struct MockPage {
    docs: HashMap<&'static str, MockDoc>,
    current: &'static str,
    /// Set when a clicked element triggers a transition; consumed by
    /// wait_for_navigation
    pending: Option<&'static str>,
    /// Last value filled per selector, shared across documents
    inputs: HashMap<String, String>,
    calls: Vec<String>,
}

impl MockPage {
    fn new(docs: HashMap<&'static str, MockDoc>, start: &'static str) -> Self {
        Self {
            docs,
            current: start,
            pending: None,
            inputs: HashMap::new(),
            calls: Vec::new(),
        }
    }

    fn doc(&self) -> &MockDoc {
        &self.docs[self.current]
    }

    fn matching(&self, target: &Locator) -> Vec<MockElement> {
        self.doc()
            .elements
            .iter()
            .filter(|el| match target {
                Locator::Selector(s) => el.selectors.contains(&s.as_str()),
                Locator::Text { selector, text } => {
                    el.selectors.contains(&selector.as_str()) && el.text == text
                }
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Page for MockPage {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.calls.push(format!("goto {url}"));
        let key = self
            .docs
            .keys()
            .filter(|key| url.ends_with(*key))
            .max_by_key(|key| key.len())
            .copied()
            .ok_or_else(|| Error::navigation(url, "unknown document"))?;
        self.current = key;
        self.pending = None;
        Ok(())
    }

    async fn evaluate(&mut self, _script: &str) -> Result<Value> {
        Err(Error::Browser("mock page has no script engine".to_string()))
    }

    async fn wait_for_navigation(&mut self) -> Result<()> {
        self.calls.push("wait_for_navigation".to_string());
        match self.pending.take() {
            Some(next) => {
                self.current = next;
                Ok(())
            }
            // No transition scripted: hang until the runner's timeout
            None => std::future::pending().await,
        }
    }

    async fn count(&mut self, target: &Locator) -> Result<usize> {
        self.calls.push(format!("count {target}"));
        Ok(self.matching(target).len())
    }

    async fn set_value(&mut self, target: &Locator, value: &str) -> Result<()> {
        self.calls.push(format!("set {target}"));
        if let Locator::Selector(s) = target {
            self.inputs.insert(s.clone(), value.to_string());
        }
        Ok(())
    }

    async fn click(&mut self, target: &Locator) -> Result<()> {
        self.calls.push(format!("click {target}"));
        if let Some(element) = self.matching(target).first() {
            if let Some(next) = element.navigates_to {
                self.pending = Some(next);
            }
        }
        Ok(())
    }

    async fn text(&mut self, target: &Locator) -> Result<Option<String>> {
        self.calls.push(format!("text {target}"));
        Ok(self.matching(target).first().map(|el| el.text.to_string()))
    }

    async fn texts(&mut self, target: &Locator) -> Result<Vec<String>> {
        self.calls.push(format!("texts {target}"));
        Ok(self
            .matching(target)
            .iter()
            .map(|el| el.text.to_string())
            .collect())
    }

    async fn label_sibling(&mut self, _heading: &str, label: &str) -> Result<Option<String>> {
        self.calls.push(format!("label {label}"));
        Ok(self
            .doc()
            .labeled
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, value)| match value {
                LabelValue::Static(s) => (*s).to_string(),
                LabelValue::FromInput(selector) => {
                    self.inputs.get(*selector).cloned().unwrap_or_default()
                }
            }))
    }
}

const HINT: &str = "I like Rick and Morty stuff";
const ADDRESS: &str = "99281 Zimmerman Manor Suite 425, East Hannah, SC 45121";

/// The fixture site: login → profile → edit → saved profile
fn santa_site(identity: &'static str) -> MockPage {
    let mut docs = HashMap::new();

    docs.insert(
        "/login",
        MockDoc {
            elements: vec![
                MockElement {
                    selectors: vec!["#username", "input"],
                    text: "",
                    navigates_to: None,
                },
                MockElement {
                    selectors: vec!["#password", "input"],
                    text: "",
                    navigates_to: None,
                },
                MockElement {
                    selectors: vec![".santa-button", "button.santa-button", "button"],
                    text: "Sign In",
                    navigates_to: Some("/profile"),
                },
            ],
            labeled: Vec::new(),
        },
    );

    docs.insert(
        "/profile",
        MockDoc {
            elements: vec![
                MockElement {
                    selectors: vec![".dropdown-toggle", ".nav-link.dropdown-toggle"],
                    text: identity,
                    navigates_to: None,
                },
                MockElement {
                    selectors: vec!["button", "button.santa-button"],
                    text: "Edit",
                    navigates_to: Some("/profile/edit"),
                },
                MockElement {
                    selectors: vec!["button", "button.santa-button"],
                    text: "Delete",
                    navigates_to: None,
                },
            ],
            labeled: vec![
                ("Hint", LabelValue::Static("old hint")),
                ("Address", LabelValue::Static("old address")),
            ],
        },
    );

    docs.insert(
        "/profile/edit",
        MockDoc {
            elements: vec![
                MockElement {
                    selectors: vec!["#hint", "input"],
                    text: "",
                    navigates_to: None,
                },
                MockElement {
                    selectors: vec!["#address", "input"],
                    text: "",
                    navigates_to: None,
                },
                MockElement {
                    selectors: vec!["button", "button.santa-button"],
                    text: "Save",
                    navigates_to: Some("/profile/saved"),
                },
                MockElement {
                    selectors: vec!["button", "button.santa-button"],
                    text: "Cancel",
                    navigates_to: None,
                },
            ],
            labeled: Vec::new(),
        },
    );

    docs.insert(
        "/profile/saved",
        MockDoc {
            elements: vec![MockElement {
                selectors: vec![".dropdown-toggle", ".nav-link.dropdown-toggle"],
                text: identity,
                navigates_to: None,
            }],
            labeled: vec![
                ("Hint", LabelValue::FromInput("#hint")),
                ("Address", LabelValue::FromInput("#address")),
            ],
        },
    );

    MockPage::new(docs, "/login")
}

fn sign_in_scenario() -> Scenario {
    Scenario::new("sign in then verify identity")
        .base_url("http://santa.test")
        .navigate("/login")
        .fill([("#username", "helenkeller"), ("#password", "helloworld")])
        .click(Locator::css(".santa-button"))
        .wait_for_navigation()
        .extract_text(Locator::css(".dropdown-toggle"))
        .assert_contains("@helenkeller")
}

fn runner() -> ScenarioRunner {
    ScenarioRunner::new(std::time::Duration::from_secs(30))
}

fn step_failure(err: Error) -> (usize, StepKind, Error) {
    match err {
        Error::Step {
            index,
            kind,
            source,
        } => (index, kind, *source),
        other => panic!("expected a step failure, got {other:?}"),
    }
}

#[tokio::test]
async fn steps_execute_in_declared_order() {
    let mut page = santa_site("@helenkeller");
    runner().run(&sign_in_scenario(), &mut page).await.unwrap();

    assert_eq!(
        page.calls,
        vec![
            "goto http://santa.test/login",
            "count selector '#username'",
            "set selector '#username'",
            "count selector '#password'",
            "set selector '#password'",
            "count selector '.santa-button'",
            "click selector '.santa-button'",
            "wait_for_navigation",
            "count selector '.dropdown-toggle'",
            "text selector '.dropdown-toggle'",
        ]
    );
}

#[tokio::test]
async fn fill_on_missing_selector_fails_fast() {
    let scenario = Scenario::new("broken fill")
        .base_url("http://santa.test")
        .navigate("/login")
        .fill([("#nonexistent", "value")])
        .click(Locator::css(".santa-button"))
        .wait_for_navigation()
        .extract_text(Locator::css(".dropdown-toggle"))
        .assert_contains("@helenkeller");

    let mut page = santa_site("@helenkeller");
    let err = runner().run(&scenario, &mut page).await.unwrap_err();

    let (index, kind, source) = step_failure(err);
    assert_eq!(index, 1);
    assert_eq!(kind, StepKind::Fill);
    assert!(matches!(source, Error::ElementNotFound(_)));

    // Fail-fast: nothing after the failing fill ran
    assert_eq!(
        page.calls,
        vec!["goto http://santa.test/login", "count selector '#nonexistent'"]
    );
}

#[tokio::test]
async fn ambiguous_fill_selector_is_rejected() {
    let scenario = Scenario::new("ambiguous fill")
        .base_url("http://santa.test")
        .navigate("/login")
        .fill([("input", "value")]);

    let mut page = santa_site("@helenkeller");
    let err = runner().run(&scenario, &mut page).await.unwrap_err();

    let (_, kind, source) = step_failure(err);
    assert_eq!(kind, StepKind::Fill);
    match source {
        Error::AmbiguousSelector { count, .. } => assert_eq!(count, 2),
        other => panic!("expected ambiguous selector, got {other:?}"),
    }
}

#[tokio::test]
async fn text_predicate_matches_exact_text_only() {
    // The profile page holds buttons "Edit", "Delete", "Save" (on the
    // edit page); the predicate must select by exact equality.
    let scenario = Scenario::new("pick edit")
        .base_url("http://santa.test")
        .navigate("/profile")
        .click(Locator::text("button", "Edit"))
        .wait_for_navigation();

    let mut page = santa_site("@helenkeller");
    runner().run(&scenario, &mut page).await.unwrap();
    assert_eq!(page.current, "/profile/edit");
}

#[tokio::test]
async fn text_predicate_is_case_sensitive() {
    let scenario = Scenario::new("wrong case")
        .base_url("http://santa.test")
        .navigate("/profile")
        .click(Locator::text("button", "edit"));

    let mut page = santa_site("@helenkeller");
    let err = runner().run(&scenario, &mut page).await.unwrap_err();

    let (_, kind, source) = step_failure(err);
    assert_eq!(kind, StepKind::Click);
    assert!(matches!(source, Error::ElementNotFound(_)));
}

#[tokio::test(start_paused = true)]
async fn wait_for_navigation_times_out() {
    // Nothing was clicked, so no transition is pending and the wait
    // never resolves on its own.
    let scenario = Scenario::new("stuck wait")
        .base_url("http://santa.test")
        .navigate("/login")
        .wait_for_navigation()
        .extract_text(Locator::css("#username"))
        .assert_equals("");

    let mut page = santa_site("@helenkeller");
    let err = runner().run(&scenario, &mut page).await.unwrap_err();

    let (index, kind, source) = step_failure(err);
    assert_eq!(index, 1);
    assert_eq!(kind, StepKind::WaitForNavigation);
    assert!(matches!(source, Error::Timeout(30)));

    // The scenario did not silently proceed past the wait
    assert_eq!(page.calls.last().map(String::as_str), Some("wait_for_navigation"));
}

#[tokio::test]
async fn sign_in_scenario_succeeds_end_to_end() {
    let mut page = santa_site("signed in as @helenkeller");
    runner().run(&sign_in_scenario(), &mut page).await.unwrap();
    assert_eq!(page.current, "/profile");
}

#[tokio::test]
async fn sign_in_detects_wrong_identity() {
    let mut page = santa_site("@wronguser");
    let err = runner().run(&sign_in_scenario(), &mut page).await.unwrap_err();

    let (index, kind, source) = step_failure(err);
    assert_eq!(index, 5);
    assert_eq!(kind, StepKind::Assert);
    match source {
        Error::Assertion { expected, actual } => {
            assert!(expected.contains("@helenkeller"));
            assert_eq!(actual, "@wronguser");
        }
        other => panic!("expected assertion failure, got {other:?}"),
    }
}

#[tokio::test]
async fn list_extraction_asserts_across_all_matches() {
    let scenario = Scenario::new("button inventory")
        .base_url("http://santa.test")
        .navigate("/profile")
        .extract_texts(Locator::css("button"))
        .assert_contains("Delete");

    let mut page = santa_site("@helenkeller");
    runner().run(&scenario, &mut page).await.unwrap();
    assert_eq!(page.calls.last().map(String::as_str), Some("texts selector 'button'"));
}

#[tokio::test]
async fn edit_profile_persists_fields() {
    let scenario = Scenario::new("edit profile persists fields")
        .base_url("http://santa.test")
        .navigate("/login")
        .fill([("#username", "helenkeller"), ("#password", "helloworld")])
        .click(Locator::css(".santa-button"))
        .wait_for_navigation()
        .click(Locator::text("button", "Edit"))
        .wait_for_navigation()
        .fill([("#hint", HINT), ("#address", ADDRESS)])
        .click(Locator::text("button", "Save"))
        .wait_for_navigation()
        .extract_label_sibling("h2", "Hint")
        .assert_equals(HINT)
        .extract_label_sibling("h2", "Address")
        .assert_equals(ADDRESS);

    let mut page = santa_site("@helenkeller");
    runner().run(&scenario, &mut page).await.unwrap();
    assert_eq!(page.current, "/profile/saved");
    assert_eq!(page.inputs["#hint"], HINT);
    assert_eq!(page.inputs["#address"], ADDRESS);
}
