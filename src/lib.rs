//! webharness - scripted browser scenario runner
//!
//! Drives a live browser page through ordered interaction steps
//! (navigate, fill, click, wait for navigation, extract, assert) and
//! fails fast on the first error. Scenarios are defined in YAML files or
//! built in code; pages are driven over the Chrome DevTools Protocol or
//! supplied by tests through the [`page::Page`] trait.

pub mod common;
pub mod locator;
pub mod page;
pub mod scenario;

// Re-export commonly used types
pub use common::{Error, Result};
pub use locator::Locator;
pub use page::{BrowserSession, Page};
pub use scenario::{Scenario, ScenarioRunner};
