//! Findings and check outcomes
//!
//! A [`Finding`] is the unit of evidence produced by a check. Its fields are
//! private: once a check hands a finding to the registry it is never
//! modified again, so downstream consumers can only read it.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a finding is
///
/// Variants are declared in ascending order so `Ord` ranks them by weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Score contribution of one finding at this severity
    pub fn weight(&self) -> Decimal {
        match self {
            Severity::Low => dec!(1),
            Severity::Medium => dec!(2),
            Severity::High => dec!(5),
            Severity::Critical => dec!(10),
        }
    }

    /// HIGH and CRITICAL findings count toward compounding
    pub fn is_severe(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }

    /// Action attached to a finding when its check has no more specific one
    pub fn default_action(&self) -> &'static str {
        match self {
            Severity::Critical => "Reject the claim and refer it to fraud investigation",
            Severity::High => "Escalate to a senior adjuster for manual review",
            Severity::Medium => "Adjuster to verify before settlement",
            Severity::Low => "Record for monitoring; no action required",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of problem a finding describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingCategory {
    Forgery,
    Mismatch,
    PreExisting,
    MetadataIssue,
    NarrativeConflict,
    Financial,
    Policy,
    SuspiciousPattern,
}

/// Verification phases, evaluated in order A through E
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    A,
    B,
    C,
    D,
    E,
}

impl Phase {
    pub fn title(&self) -> &'static str {
        match self {
            Phase::A => "Integrity & Source",
            Phase::B => "Vehicle & Damage",
            Phase::C => "Contextual Consistency",
            Phase::D => "Financial Sanity",
            Phase::E => "Policy & History",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Phase {:?}: {}", self, self.title())
    }
}

/// The sixteen verification checks, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckId {
    ImageQuality,
    Metadata,
    ReverseImage,
    DigitalForgery,
    VehicleMatch,
    LicensePlate,
    VinMatch,
    PreExistingDamage,
    DamageCorroboration,
    TotalLossMarkers,
    NarrativeConsistency,
    MultiImageConsistency,
    AmountThreshold,
    DamageCostSanity,
    PolicyCoverage,
    DuplicateClaim,
}

impl CheckId {
    pub const COUNT: usize = 16;

    /// All checks in execution order
    pub const ALL: [CheckId; Self::COUNT] = [
        CheckId::ImageQuality,
        CheckId::Metadata,
        CheckId::ReverseImage,
        CheckId::DigitalForgery,
        CheckId::VehicleMatch,
        CheckId::LicensePlate,
        CheckId::VinMatch,
        CheckId::PreExistingDamage,
        CheckId::DamageCorroboration,
        CheckId::TotalLossMarkers,
        CheckId::NarrativeConsistency,
        CheckId::MultiImageConsistency,
        CheckId::AmountThreshold,
        CheckId::DamageCostSanity,
        CheckId::PolicyCoverage,
        CheckId::DuplicateClaim,
    ];

    /// 1-based position in the execution order
    pub fn number(&self) -> u8 {
        *self as u8 + 1
    }

    pub fn phase(&self) -> Phase {
        match self {
            CheckId::ImageQuality
            | CheckId::Metadata
            | CheckId::ReverseImage
            | CheckId::DigitalForgery => Phase::A,
            CheckId::VehicleMatch
            | CheckId::LicensePlate
            | CheckId::VinMatch
            | CheckId::PreExistingDamage
            | CheckId::DamageCorroboration
            | CheckId::TotalLossMarkers => Phase::B,
            CheckId::NarrativeConsistency | CheckId::MultiImageConsistency => Phase::C,
            CheckId::AmountThreshold | CheckId::DamageCostSanity => Phase::D,
            CheckId::PolicyCoverage | CheckId::DuplicateClaim => Phase::E,
        }
    }

    /// Human-readable check name
    pub fn name(&self) -> &'static str {
        match self {
            CheckId::ImageQuality => "Image Quality Gate",
            CheckId::Metadata => "Metadata Verification",
            CheckId::ReverseImage => "Reverse-Image / Stock-Photo Heuristic",
            CheckId::DigitalForgery => "Digital Forgery Detection",
            CheckId::VehicleMatch => "Vehicle Match",
            CheckId::LicensePlate => "License Plate Match",
            CheckId::VinMatch => "Chassis/VIN Match",
            CheckId::PreExistingDamage => "Pre-existing Damage",
            CheckId::DamageCorroboration => "Corroboration Check",
            CheckId::TotalLossMarkers => "Totalled-Vehicle Marker Check",
            CheckId::NarrativeConsistency => "Narrative Consistency",
            CheckId::MultiImageConsistency => "Multi-Image Consistency",
            CheckId::AmountThreshold => "Amount Threshold",
            CheckId::DamageCostSanity => "Damage-Cost Sanity",
            CheckId::PolicyCoverage => "Policy Active & Coverage",
            CheckId::DuplicateClaim => "Duplicate/Repeat Claim Guard",
        }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.number(), self.name())
    }
}

/// A single verification failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    check: CheckId,
    rule_id: String,
    category: FindingCategory,
    severity: Severity,
    reason: String,
    required_action: String,
    phase: Phase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    indicator_confidence: Option<u8>,
}

impl Finding {
    /// Creates a finding with the severity's default action
    pub fn new(
        check: CheckId,
        rule_id: impl Into<String>,
        category: FindingCategory,
        severity: Severity,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            check,
            rule_id: rule_id.into(),
            category,
            severity,
            reason: reason.into(),
            required_action: severity.default_action().to_string(),
            phase: check.phase(),
            indicator_confidence: None,
        }
    }

    /// Replaces the required action
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.required_action = action.into();
        self
    }

    /// Attaches an informational confidence percentage
    pub fn with_indicator_confidence(mut self, percent: u8) -> Self {
        self.indicator_confidence = Some(percent.min(100));
        self
    }

    pub fn check(&self) -> CheckId {
        self.check
    }

    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    pub fn category(&self) -> FindingCategory {
        self.category
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn required_action(&self) -> &str {
        &self.required_action
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn indicator_confidence(&self) -> Option<u8> {
        self.indicator_confidence
    }
}

/// Result of running one check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckOutcome {
    Passed {
        check: CheckId,
        phase: Phase,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    Failed(Finding),
}

impl CheckOutcome {
    pub fn check(&self) -> CheckId {
        match self {
            CheckOutcome::Passed { check, .. } => *check,
            CheckOutcome::Failed(finding) => finding.check(),
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            CheckOutcome::Passed { phase, .. } => *phase,
            CheckOutcome::Failed(finding) => finding.phase(),
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, CheckOutcome::Passed { .. })
    }

    pub fn finding(&self) -> Option<&Finding> {
        match self {
            CheckOutcome::Failed(finding) => Some(finding),
            CheckOutcome::Passed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_weights() {
        assert_eq!(Severity::Low.weight(), Decimal::from(1));
        assert_eq!(Severity::Medium.weight(), Decimal::from(2));
        assert_eq!(Severity::High.weight(), Decimal::from(5));
        assert_eq!(Severity::Critical.weight(), Decimal::from(10));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert!(Severity::High.is_severe());
        assert!(!Severity::Medium.is_severe());
    }

    #[test]
    fn test_check_numbering_and_phases() {
        assert_eq!(CheckId::ImageQuality.number(), 1);
        assert_eq!(CheckId::DuplicateClaim.number(), 16);
        for (index, check) in CheckId::ALL.iter().enumerate() {
            assert_eq!(check.number() as usize, index + 1);
        }
        assert_eq!(CheckId::DigitalForgery.phase(), Phase::A);
        assert_eq!(CheckId::TotalLossMarkers.phase(), Phase::B);
        assert_eq!(CheckId::MultiImageConsistency.phase(), Phase::C);
        assert_eq!(CheckId::AmountThreshold.phase(), Phase::D);
        assert_eq!(CheckId::PolicyCoverage.phase(), Phase::E);
    }

    #[test]
    fn test_phases_are_monotonic_in_check_order() {
        let phases: Vec<Phase> = CheckId::ALL.iter().map(CheckId::phase).collect();
        assert!(phases.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_finding_takes_phase_from_check() {
        let finding = Finding::new(
            CheckId::LicensePlate,
            "PLATE_MISMATCH",
            FindingCategory::Mismatch,
            Severity::Critical,
            "Plate mismatch",
        );
        assert_eq!(finding.phase(), Phase::B);
        assert_eq!(finding.required_action(), Severity::Critical.default_action());
        assert_eq!(finding.indicator_confidence(), None);
    }

    #[test]
    fn test_indicator_confidence_is_capped() {
        let finding = Finding::new(
            CheckId::PreExistingDamage,
            "PRE_EXISTING_DAMAGE",
            FindingCategory::PreExisting,
            Severity::High,
            "Rust",
        )
        .with_indicator_confidence(140);
        assert_eq!(finding.indicator_confidence(), Some(100));
    }

    #[test]
    fn test_outcome_serialization_is_tagged() {
        let passed = CheckOutcome::Passed {
            check: CheckId::VinMatch,
            phase: Phase::B,
            note: None,
        };
        let json = serde_json::to_value(&passed).unwrap();
        assert_eq!(json["outcome"], "passed");
        assert_eq!(json["check"], "VIN_MATCH");
        assert!(json.get("note").is_none());

        let failed = CheckOutcome::Failed(Finding::new(
            CheckId::Metadata,
            "GPS_MISSING",
            FindingCategory::MetadataIssue,
            Severity::Low,
            "No GPS",
        ));
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["severity"], "LOW");
        assert_eq!(json["phase"], "A");

        let back: CheckOutcome = serde_json::from_value(json).unwrap();
        assert_eq!(back, failed);
    }
}
