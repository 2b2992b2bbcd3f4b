//! Test harness for running fixtures with stochastic variations

use std::io::BufReader;

use json2xml_core::{convert, Error};
use quick_xml::Writer;

use crate::common::loader::TestCase;
use crate::common::Gen;

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub input: String,
    pub expected: String,
    pub actual: String,
    pub seed: u64,
    pub errors: Vec<String>,
}

/// Stable name for an error kind (offsets and payloads dropped)
pub fn error_name(err: &Error) -> String {
    match err {
        Error::InvalidKey { .. } => "invalid_key".to_string(),
        Error::InvalidToken { .. } => "invalid_token".to_string(),
        Error::UnknownToken { .. } => "unknown_token".to_string(),
        Error::Syntax { code, .. } => format!("syntax/{:?}", code),
        Error::Truncated { .. } => "truncated".to_string(),
        other => format!("other/{}", other),
    }
}

/// Convert with a given read buffer size, rendering either the XML or
/// `error: <kind>`
fn run_conversion(input: &str, capacity: usize) -> String {
    let reader = BufReader::with_capacity(capacity, input.as_bytes());
    let mut writer = Writer::new(Vec::new());
    match convert(reader, &mut writer) {
        Ok(_) => String::from_utf8(writer.into_inner()).expect("quick-xml writes utf-8"),
        Err(err) => format!("error: {}", error_name(&err)),
    }
}

fn expected_output(case: &TestCase) -> String {
    match (&case.xml, &case.error) {
        (Some(xml), _) => xml.clone(),
        (None, Some(error)) => format!("error: {}", error),
        (None, None) => unreachable!("loader rejects cases without expectation"),
    }
}

fn check(input: String, expected: String, actual: String, seed: u64) -> TestResult {
    let mut errors = Vec::new();
    if actual != expected {
        errors.push(format!("expected {:?}, got {:?}", expected, actual));
    }
    TestResult {
        passed: errors.is_empty(),
        input,
        expected,
        actual,
        seed,
        errors,
    }
}

/// Run a single test case (canonical, no variations)
pub fn run_test(case: &TestCase) -> TestResult {
    let actual = run_conversion(&case.json, 8 * 1024);
    check(case.json.clone(), expected_output(case), actual, 0)
}

/// Run test with stochastic variations
///
/// Applies independent variations:
/// - Random whitespace around structural characters
/// - Random read buffer capacity (down to a single byte)
pub fn run_with_variations(case: &TestCase, gen: &mut Gen) -> TestResult {
    let input = gen.sprinkle_whitespace(&case.json);
    let capacity = gen.buffer_capacity();
    let actual = run_conversion(&input, capacity);
    check(input, expected_output(case), actual, gen.seed)
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!("Seed: {} (set JSON2XML_TEST_SEED={} to reproduce)", self.seed, self.seed);
        eprintln!("\nInput:\n{}", self.input);
        eprintln!("\nExpected:\n{}", self.expected);
        eprintln!("\nActual:\n{}", self.actual);
        eprintln!("\nErrors:");
        for e in &self.errors {
            eprintln!("  - {}", e);
        }
    }
}
