//! Library interface for the ragbench CLI
//!
//! Test case and result file handling, exposed for integration testing while
//! the command dispatch stays in main.rs.

use anyhow::{Context, Result};
use ragbench_core::{TestCase, TestResult};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Read a JSON array of test cases
pub fn read_test_cases(path: &Path) -> Result<Vec<TestCase>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read test cases from {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Invalid test case file {}", path.display()))
}

/// Pretty-print results as JSON to `output`, or to stdout when no file is given
pub fn write_results(results: &[TestResult], output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(results).context("Failed to serialize results")?;

    match output {
        Some(path) => fs::write(path, format!("{json}\n"))
            .with_context(|| format!("Failed to write results to {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("Failed to write results to stdout")
        }
    }
}
