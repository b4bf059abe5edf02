//! End-to-end tests for the CLI commands, reading and writing real files

use std::fs;
use std::path::PathBuf;

use core_kernel::ClaimId;
use domain_verification::reference::PolicyStatus;
use domain_verification::{CheckId, Severity, Verdict, VerificationConfig, VerificationResult};
use interface_cli::{commands, settings};
use rust_decimal_macros::dec;
use test_utils::{assert_check_failed, assert_verdict, FactBundleBuilder, ReferenceDataBuilder};

/// Scratch directory removed on drop
struct Scratch(PathBuf);

impl Scratch {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("claim-verify-{}", ClaimId::new()));
        fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.0.join(name);
        fs::write(&path, content).unwrap();
        path
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn write_inputs(scratch: &Scratch, facts: FactBundleBuilder, reference: ReferenceDataBuilder) -> (PathBuf, PathBuf) {
    let facts = scratch.write("facts.json", &serde_json::to_string(&facts.build()).unwrap());
    let reference = scratch.write("reference.json", &serde_json::to_string(&reference.build()).unwrap());
    (facts, reference)
}

#[test]
fn test_evaluate_clean_claim_from_files() {
    let scratch = Scratch::new();
    let (facts, reference) = write_inputs(&scratch, FactBundleBuilder::new(), ReferenceDataBuilder::new());

    let result = commands::evaluate_files(&facts, &reference, &VerificationConfig::default()).unwrap();

    assert_verdict(&result, Verdict::Approved);
    assert_eq!(result.outcomes.len(), CheckId::COUNT);
}

#[test]
fn test_evaluate_inactive_policy_from_files() {
    let scratch = Scratch::new();
    let (facts, reference) = write_inputs(
        &scratch,
        FactBundleBuilder::new(),
        ReferenceDataBuilder::new().with_status(PolicyStatus::Expired),
    );

    let result = commands::evaluate_files(&facts, &reference, &VerificationConfig::default()).unwrap();

    assert_verdict(&result, Verdict::Rejected);
    assert_check_failed(&result, CheckId::PolicyCoverage, Severity::Critical);
}

#[test]
fn test_rendered_result_parses_back() {
    let scratch = Scratch::new();
    let (facts, reference) = write_inputs(&scratch, FactBundleBuilder::new(), ReferenceDataBuilder::new());
    let result = commands::evaluate_files(&facts, &reference, &VerificationConfig::default()).unwrap();

    for pretty in [false, true] {
        let json = commands::render(&result, pretty).unwrap();
        let parsed: VerificationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}

#[test]
fn test_malformed_bundle_names_the_file() {
    let scratch = Scratch::new();
    let facts = scratch.write("facts.json", "{ not json");
    let reference = scratch.write(
        "reference.json",
        &serde_json::to_string(&ReferenceDataBuilder::new().build()).unwrap(),
    );

    let err = commands::evaluate_files(&facts, &reference, &VerificationConfig::default()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Invalid fact bundle"), "{message}");
    assert!(message.contains("facts.json"), "{message}");
}

#[test]
fn test_invalid_bundle_is_refused_before_evaluation() {
    let scratch = Scratch::new();
    let mut parts = FactBundleBuilder::new().parts();
    parts.identity.detection_confidence = 1.5;
    let facts = scratch.write("facts.json", &serde_json::to_string(&parts).unwrap());
    let reference = scratch.write(
        "reference.json",
        &serde_json::to_string(&ReferenceDataBuilder::new().build()).unwrap(),
    );

    let result = commands::evaluate_files(&facts, &reference, &VerificationConfig::default());
    assert!(result.is_err());
}

#[test]
fn test_missing_reference_file() {
    let scratch = Scratch::new();
    let facts = scratch.write("facts.json", &serde_json::to_string(&FactBundleBuilder::new().build()).unwrap());

    let err = commands::evaluate_files(&facts, &scratch.0.join("absent.json"), &VerificationConfig::default())
        .unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read reference data"));
}

#[test]
fn test_threshold_file_changes_the_verdict() {
    let scratch = Scratch::new();
    let (facts, reference) = write_inputs(
        &scratch,
        FactBundleBuilder::new().with_claimed_amount(test_utils::MoneyFixtures::inr(60_000)),
        ReferenceDataBuilder::new(),
    );

    let default = commands::evaluate_files(&facts, &reference, &VerificationConfig::default()).unwrap();
    assert_check_failed(&default, CheckId::AmountThreshold, Severity::Medium);

    let thresholds = scratch.write("thresholds.toml", "auto_approval_ceiling = 100000\n");
    let config = settings::load_thresholds_with_env(Some(&thresholds), Some(Default::default())).unwrap();
    assert_eq!(config.auto_approval_ceiling, dec!(100000));
    assert_eq!(config.reject_threshold, dec!(10));

    let raised = commands::evaluate_files(&facts, &reference, &config).unwrap();
    assert!(raised.finding(CheckId::AmountThreshold).is_none());
}

#[test]
fn test_rendered_thresholds_reload_as_config() {
    let scratch = Scratch::new();
    let json = commands::render_thresholds(&VerificationConfig::default()).unwrap();
    let path = scratch.write("thresholds.json", &json);

    let config = settings::load_thresholds_with_env(Some(&path), Some(Default::default())).unwrap();
    assert_eq!(config, VerificationConfig::default());
}

#[test]
fn test_emit_writes_file() {
    let scratch = Scratch::new();
    let path = scratch.0.join("out.json");
    commands::emit("{}", Some(&path)).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
}
