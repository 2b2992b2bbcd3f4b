//! Fixture loading from YAML files

use serde::Deserialize;
use std::path::Path;

/// A single test case from a fixture file.
///
/// Exactly one of `xml` (successful conversion) or `error` (expected
/// failure kind) is set.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub desc: String,
    pub json: String,
    #[serde(default)]
    pub xml: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Load all test cases from a YAML fixture file
pub fn load_fixtures(path: &Path) -> Vec<TestCase> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read fixture file {:?}: {}", path, e));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture file {:?}: {}", path, e))
}

/// Load fixtures from the standard fixtures directory
pub fn load_fixtures_by_name(name: &str) -> Vec<TestCase> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.yaml", name));
    let cases = load_fixtures(&path);
    for case in &cases {
        assert!(
            case.xml.is_some() != case.error.is_some(),
            "fixture {}::{} must set exactly one of `xml` or `error`",
            name,
            case.id
        );
    }
    cases
}
