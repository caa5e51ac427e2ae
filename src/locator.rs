//! Element resolution strategies
//!
//! A [`Locator`] names the target of a fill/click/extract step either by
//! CSS selector or by exact visible-text match over a candidate set. The
//! locator owns the JavaScript query generation, so step execution never
//! ships ad-hoc closures into the page context: every page adapter
//! receives the same canonical query strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A strategy for resolving a step's target element(s)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locator {
    /// CSS selector (e.g. `button.santa-button`)
    Selector(String),
    /// Elements matching `selector` whose visible text equals `text`
    /// exactly (case-sensitive)
    Text {
        /// CSS selector for the candidate set
        selector: String,
        /// Exact visible text to match
        text: String,
    },
}

impl Locator {
    /// Create a CSS selector locator
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Selector(selector.into())
    }

    /// Create an exact-text locator over a candidate selector
    pub fn text(selector: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Text {
            selector: selector.into(),
            text: text.into(),
        }
    }

    /// JavaScript expression yielding the matching elements as an array
    fn candidates_js(&self) -> String {
        match self {
            Self::Selector(s) => format!("[...document.querySelectorAll({s:?})]"),
            Self::Text { selector, text } => format!(
                "[...document.querySelectorAll({selector:?})].filter((el) => el.innerText === {text:?})"
            ),
        }
    }

    /// Query counting the matching elements
    pub fn count_js(&self) -> String {
        format!("{}.length", self.candidates_js())
    }

    /// Query returning the visible text of the first match, or null
    pub fn first_text_js(&self) -> String {
        format!(
            "(() => {{ const m = {}; return m.length ? m[0].innerText : null; }})()",
            self.candidates_js()
        )
    }

    /// Query returning the visible text of every match
    pub fn all_texts_js(&self) -> String {
        format!("{}.map((el) => el.innerText)", self.candidates_js())
    }

    /// Statement setting the value of the first match
    ///
    /// Dispatches an `input` event so framework-bound fields observe the
    /// change the same way a keyboard entry would.
    pub fn set_value_js(&self, value: &str) -> String {
        format!(
            "(() => {{ const el = {}[0]; el.value = {value:?}; el.dispatchEvent(new Event('input', {{ bubbles: true }})); }})()",
            self.candidates_js()
        )
    }

    /// Statement clicking the first match
    pub fn click_js(&self) -> String {
        format!("{}[0].click()", self.candidates_js())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selector(s) => write!(f, "selector '{s}'"),
            Self::Text { selector, text } => {
                write!(f, "{selector} with text \"{text}\"")
            }
        }
    }
}

/// Query returning the text of the sibling immediately following the
/// child whose text equals `label`, within the parent of the element
/// matching `heading`. Used for definition-list style "Label / value"
/// layouts where the value carries no selector of its own.
pub fn label_sibling_js(heading: &str, label: &str) -> String {
    format!(
        "(() => {{ const root = document.querySelector({heading:?}); if (!root) return null; \
         const texts = [...root.parentElement.children].map((el) => el.innerText); \
         const i = texts.indexOf({label:?}); \
         return i >= 0 && i + 1 < texts.length ? texts[i + 1] : null; }})()"
    )
}
