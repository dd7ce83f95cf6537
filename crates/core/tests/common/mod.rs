//! Shared test helpers for `tplint_core` integration tests.

#![allow(unreachable_pub)]

use tplint_core::{
    Diagnostic, ValidateOptions, ValidationResult, validate_str, validate_with_options,
};

/// Validate with empty auxiliary sources, panicking on the fatal path.
#[allow(dead_code)]
pub fn check(content: &str) -> ValidationResult {
    validate_str(content, "test.tpl").expect("template should not hit the fatal path")
}

/// Validate with the given controller/ambient sources, panicking on the fatal path.
#[allow(dead_code)]
pub fn check_with_sources(content: &str, controller: &str, ambient: &str) -> ValidationResult {
    let options = ValidateOptions {
        controller_source: controller.to_string(),
        ambient_source: ambient.to_string(),
    };
    validate_with_options(content, "test.tpl", &options)
        .expect("template should not hit the fatal path")
}

/// Collect diagnostic codes in output order.
#[allow(dead_code)]
pub fn extract_codes(result: &ValidationResult) -> Vec<String> {
    result.issues.iter().map(|d| d.id.to_string()).collect()
}

/// Collect (line, column) pairs in output order.
#[allow(dead_code)]
pub fn extract_positions(result: &ValidationResult) -> Vec<(u32, u32)> {
    result.issues.iter().map(|d| (d.line, d.column)).collect()
}

/// Find the first diagnostic with the given code.
#[allow(dead_code)]
pub fn find_diag<'a>(issues: &'a [Diagnostic], code: &str) -> &'a Diagnostic {
    issues
        .iter()
        .find(|d| &*d.id == code)
        .unwrap_or_else(|| panic!("expected diagnostic {code}"))
}
