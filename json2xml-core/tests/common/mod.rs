//! Test infrastructure for the JSON to XML converter
//!
//! Provides fixture loading, stochastic test generation, and assertion helpers.

mod generators;
mod harness;
mod loader;

pub use generators::Gen;
pub use harness::{run_test, run_with_variations};
pub use loader::load_fixtures_by_name;
