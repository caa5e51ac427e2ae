//! Scenario file loading tests against the shipped fixtures

use std::io::Write;
use std::path::PathBuf;

use webharness::locator::Locator;
use webharness::scenario::{load_scenario, Step, StepKind};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn sign_in_fixture_loads() {
    let scenario = load_scenario(&fixture("sign_in.yaml")).unwrap();
    assert_eq!(scenario.name, "sign in then verify identity");
    assert_eq!(scenario.base_url.as_deref(), Some("http://localhost:9000"));
    assert_eq!(scenario.steps.len(), 6);
}

#[test]
fn edit_profile_fixture_loads() {
    let scenario = load_scenario(&fixture("edit_profile.yaml")).unwrap();
    assert_eq!(scenario.steps.len(), 13);

    // Text-predicate clicks default to button candidates
    match &scenario.steps[4] {
        Step::Click { target } => assert_eq!(target, &Locator::text("button", "Edit")),
        other => panic!("expected click step, got {other:?}"),
    }

    // Each click that transitions is followed by a wait
    let kinds: Vec<StepKind> = scenario.steps.iter().map(Step::kind).collect();
    for pair in kinds.windows(2) {
        if pair[0] == StepKind::WaitForNavigation {
            assert_ne!(pair[1], StepKind::WaitForNavigation);
        }
    }
}

#[test]
fn missing_file_reports_the_path() {
    let err = load_scenario(&fixture("does_not_exist.yaml")).unwrap_err();
    assert!(err.to_string().contains("does_not_exist.yaml"));
}

#[test]
fn invalid_yaml_reports_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "name: broken\nsteps:\n  - action: teleport").unwrap();

    let err = load_scenario(&path).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("broken.yaml"));
    assert!(message.contains("teleport") || message.contains("unknown variant"));
}
