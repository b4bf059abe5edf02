//! Severity scoring
//!
//! Scores are exact decimals end to end so that the same findings always
//! produce byte-identical numbers.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::finding::CheckOutcome;

/// Score at which confidence bottoms out
const CONFIDENCE_SCORE_CEILING: Decimal = dec!(50);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    /// Sum of finding weights
    pub raw_score: Decimal,
    /// Raw score after the compounding multiplier, if it applied
    pub final_score: Decimal,
    /// 0-100, two decimal places
    pub confidence_score: Decimal,
    pub compounding_applied: bool,
    pub severe_findings: usize,
    pub passed_checks: usize,
    pub total_checks: usize,
}

/// Aggregates the outcomes of one evaluation into scores
///
/// # Arguments
///
/// * `outcomes` - One outcome per check, in registry order
/// * `thresholds` - Supplies the compounding trigger and multiplier
pub fn score(outcomes: &[CheckOutcome], thresholds: &Thresholds) -> ScoreCard {
    let findings: Vec<_> = outcomes.iter().filter_map(CheckOutcome::finding).collect();

    let raw_score: Decimal = findings.iter().map(|f| f.severity().weight()).sum();
    let severe_findings = findings.iter().filter(|f| f.severity().is_severe()).count();

    let compounding_applied = severe_findings >= thresholds.compound_failure_threshold;
    let final_score = if compounding_applied {
        raw_score
            .saturating_mul(thresholds.compound_multiplier)
            .normalize()
    } else {
        raw_score
    };

    let total_checks = outcomes.len();
    let passed_checks = total_checks - findings.len();

    ScoreCard {
        raw_score,
        final_score,
        confidence_score: confidence(passed_checks, total_checks, final_score),
        compounding_applied,
        severe_findings,
        passed_checks,
        total_checks,
    }
}

/// `max(0, pass_rate - min(final / 50, 1)) * 100`, rounded to 2 dp
fn confidence(passed: usize, total: usize, final_score: Decimal) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    let pass_rate = Decimal::from(passed) / Decimal::from(total);
    let penalty = (final_score / CONFIDENCE_SCORE_CEILING).min(Decimal::ONE);
    let confidence = (pass_rate - penalty).max(Decimal::ZERO) * dec!(100);
    confidence.round_dp(2).normalize()
}
