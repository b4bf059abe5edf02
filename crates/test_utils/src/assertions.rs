//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for verification results that
//! give more meaningful failure messages than bare `assert_eq!`.

use core_kernel::Money;
use domain_verification::{
    CheckId, CheckOutcome, Severity, Verdict, VerificationConfig, VerificationResult,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Renders the failed checks of a result for assertion messages
pub fn describe_findings(result: &VerificationResult) -> String {
    let lines: Vec<String> = result
        .findings()
        .map(|f| format!("{} {} [{}] {}", f.check(), f.severity(), f.rule_id(), f.reason()))
        .collect();
    if lines.is_empty() {
        "no findings".to_string()
    } else {
        lines.join("\n")
    }
}

/// Asserts the verdict, listing every finding on failure
pub fn assert_verdict(result: &VerificationResult, expected: Verdict) {
    assert_eq!(
        result.verdict,
        expected,
        "Unexpected verdict (score {}):\n{}",
        result.final_score,
        describe_findings(result)
    );
}

/// Asserts that a check failed with the given severity
///
/// # Panics
///
/// Panics if the check passed or failed with a different severity
pub fn assert_check_failed(result: &VerificationResult, check: CheckId, severity: Severity) {
    match result.outcome(check) {
        Some(CheckOutcome::Failed(finding)) => assert_eq!(
            finding.severity(),
            severity,
            "{check} failed with {} instead of {severity}: {}",
            finding.severity(),
            finding.reason()
        ),
        other => panic!("Expected {check} to fail with {severity}, got {other:?}"),
    }
}

/// Asserts that a check failed with a specific rule id
pub fn assert_rule(result: &VerificationResult, check: CheckId, rule_id: &str) {
    let finding = result
        .finding(check)
        .unwrap_or_else(|| panic!("Expected {check} to fail with {rule_id}, but it passed"));
    assert_eq!(finding.rule_id(), rule_id, "{}", finding.reason());
}

/// Asserts that a check passed
pub fn assert_check_passed(result: &VerificationResult, check: CheckId) {
    let outcome = result
        .outcome(check)
        .unwrap_or_else(|| panic!("No outcome recorded for {check}"));
    assert!(
        outcome.is_passed(),
        "Expected {check} to pass, got {:?}",
        outcome.finding()
    );
}

/// Asserts every check except the listed ones passed
pub fn assert_only_failed(result: &VerificationResult, failed: &[CheckId]) {
    for check in CheckId::ALL {
        if failed.contains(&check) {
            assert!(result.finding(check).is_some(), "Expected {check} to fail");
        } else {
            assert_check_passed(result, check);
        }
    }
}

/// Asserts the structural invariants every result must satisfy
pub fn assert_result_invariants(result: &VerificationResult, config: &VerificationConfig) {
    assert_eq!(result.outcomes.len(), CheckId::COUNT, "every check runs exactly once");
    for (outcome, expected) in result.outcomes.iter().zip(CheckId::ALL) {
        assert_eq!(outcome.check(), expected, "outcomes follow check order");
        assert_eq!(outcome.phase(), expected.phase());
    }

    let raw: Decimal = result.findings().map(|f| f.severity().weight()).sum();
    assert_eq!(result.raw_score, raw, "raw score is the sum of weights");
    assert!(result.final_score >= result.raw_score);
    assert!(result.confidence_score >= dec!(0) && result.confidence_score <= dec!(100));
    assert_eq!(result.confidence_score, result.confidence_score.round_dp(2));

    match result.verdict {
        Verdict::Rejected => assert!(
            result.has_critical() || result.final_score >= config.reject_threshold,
            "REJECTED without a CRITICAL finding or a rejecting score"
        ),
        Verdict::Flagged => {
            assert!(!result.has_critical(), "FLAGGED with a CRITICAL finding");
            assert!(result.final_score >= config.flag_threshold);
        }
        Verdict::Approved => {
            assert!(!result.has_critical());
            assert!(result.final_score < config.flag_threshold);
        }
    }
}

/// Asserts that two Money values are approximately equal within a tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}
