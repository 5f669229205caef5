//! Custom Test Assertions
//!
//! Assertion helpers with messages that show the whole error map or report
//! when they fail.

use core_kernel::FieldErrors;
use domain_policy::{CommissionReport, Policy};
use rust_decimal::Decimal;

/// Asserts that a field carries at least one message
pub fn assert_field_error(errors: &FieldErrors, field: &str) {
    assert!(
        errors.contains(field),
        "Expected an error on '{}', got: {}",
        field,
        errors
    );
}

/// Asserts that a field carries exactly this message, among others
pub fn assert_field_message(errors: &FieldErrors, field: &str, message: &str) {
    let messages = errors.get(field).unwrap_or_default();
    assert!(
        messages.iter().any(|m| m == message),
        "Expected '{}' on '{}', got: {}",
        message,
        field,
        errors
    );
}

/// Asserts that exactly these fields carry messages
pub fn assert_error_fields(errors: &FieldErrors, expected: &[&str]) {
    let mut expected: Vec<&str> = expected.to_vec();
    expected.sort_unstable();
    let actual: Vec<&str> = errors.field_names().collect();
    assert_eq!(actual, expected, "Unexpected error fields: {}", errors);
}

/// Asserts a report's total commission
pub fn assert_total_commission(report: &CommissionReport, expected: Option<Decimal>) {
    assert_eq!(
        report.total_commission, expected,
        "Total commission mismatch for {} policies",
        report.len()
    );
}

/// Asserts that policies are listed in this code order
pub fn assert_policy_codes(policies: &[Policy], expected: &[&str]) {
    let actual: Vec<&str> = policies.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(actual, expected, "Policy codes out of order");
}
