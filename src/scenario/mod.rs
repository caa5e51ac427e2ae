//! Scenario definition and execution
//!
//! A scenario is an ordered, named sequence of browser interaction and
//! assertion steps. [`file`] loads declarative YAML scenarios, [`types`]
//! holds the runtime model and builder, and [`runner`] executes steps
//! against a [`crate::page::Page`].

pub mod file;
pub mod runner;
pub mod types;

pub use file::{load_scenario, ScenarioFile};
pub use runner::{run_file, RunReport, ScenarioRunner};
pub use types::{Expectation, Extracted, Extraction, Scenario, Step, StepKind};
