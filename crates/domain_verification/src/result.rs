//! The verification result handed back to the caller

use chrono::{DateTime, Utc};
use core_kernel::ClaimId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decision::{ConfidenceLevel, ReviewPriority, Verdict};
use crate::finding::{CheckId, CheckOutcome, Finding, Severity};

/// Auditable outcome of one evaluation
///
/// Contains no maps, so serializing the same result twice yields identical
/// bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub claim_id: ClaimId,
    pub submitted_at: DateTime<Utc>,
    pub verdict: Verdict,
    pub review_priority: ReviewPriority,
    pub confidence_level: ConfidenceLevel,
    pub confidence_score: Decimal,
    pub raw_score: Decimal,
    pub final_score: Decimal,
    pub compounding_applied: bool,
    pub auto_approved: bool,
    pub requires_monitoring: bool,
    pub reasoning: String,
    /// One outcome per check, in execution order
    pub outcomes: Vec<CheckOutcome>,
}

impl VerificationResult {
    /// Findings in check order
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.outcomes.iter().filter_map(CheckOutcome::finding)
    }

    pub fn passed_checks(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_passed()).count()
    }

    pub fn failed_checks(&self) -> usize {
        self.outcomes.len() - self.passed_checks()
    }

    pub fn outcome(&self, check: CheckId) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|o| o.check() == check)
    }

    pub fn finding(&self, check: CheckId) -> Option<&Finding> {
        self.outcome(check).and_then(CheckOutcome::finding)
    }

    /// Worst severity among the findings, if any
    pub fn highest_severity(&self) -> Option<Severity> {
        self.findings().map(Finding::severity).max()
    }

    pub fn has_critical(&self) -> bool {
        self.highest_severity() == Some(Severity::Critical)
    }
}
