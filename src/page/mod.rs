//! Live connection to a browser tab
//!
//! [`Page`] is the seam between the runner and whatever drives the real
//! browser. Implementors supply three primitives (`goto`, `evaluate`,
//! `wait_for_navigation`); the element-level operations are provided
//! methods expressed through `evaluate` and the [`Locator`] query
//! builders, so every backend resolves elements identically. Tests
//! override the provided methods with an in-memory document instead.

pub mod chrome;

use async_trait::async_trait;
use serde_json::Value;

use crate::common::{Error, Result};
use crate::locator::{label_sibling_js, Locator};

pub use chrome::{BrowserSession, ChromePage};

/// Live connection to a single browser tab/document under test
///
/// A page outlives any single scenario and is borrowed by the runner
/// for a scenario's duration; it is never shared concurrently.
#[async_trait]
pub trait Page: Send {
    /// Load a URL, resolving when the document has loaded
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Run a JavaScript expression against the live document and return
    /// its serializable result
    async fn evaluate(&mut self, script: &str) -> Result<Value>;

    /// Suspend until the page reports a new document loaded
    ///
    /// Unbounded; the runner applies the configured timeout around it.
    async fn wait_for_navigation(&mut self) -> Result<()>;

    /// Number of elements matching the locator
    async fn count(&mut self, target: &Locator) -> Result<usize> {
        let value = self.evaluate(&target.count_js()).await?;
        value
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| Error::Evaluation(format!("expected a count, got {value}")))
    }

    /// Set the value of the first element matching the locator
    async fn set_value(&mut self, target: &Locator, value: &str) -> Result<()> {
        self.evaluate(&target.set_value_js(value)).await?;
        Ok(())
    }

    /// Click the first element matching the locator
    async fn click(&mut self, target: &Locator) -> Result<()> {
        self.evaluate(&target.click_js()).await?;
        Ok(())
    }

    /// Visible text of the first element matching the locator
    async fn text(&mut self, target: &Locator) -> Result<Option<String>> {
        let value = self.evaluate(&target.first_text_js()).await?;
        as_optional_text(value)
    }

    /// Visible text of every element matching the locator
    async fn texts(&mut self, target: &Locator) -> Result<Vec<String>> {
        let value = self.evaluate(&target.all_texts_js()).await?;
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        Error::Evaluation(format!("expected a string, got {item}"))
                    })
                })
                .collect(),
            other => Err(Error::Evaluation(format!("expected an array, got {other}"))),
        }
    }

    /// Text of the sibling following the child whose text equals
    /// `label`, within the parent of the element matching `heading`
    async fn label_sibling(&mut self, heading: &str, label: &str) -> Result<Option<String>> {
        let value = self.evaluate(&label_sibling_js(heading, label)).await?;
        as_optional_text(value)
    }
}

fn as_optional_text(value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(Error::Evaluation(format!(
            "expected text or null, got {other}"
        ))),
    }
}
