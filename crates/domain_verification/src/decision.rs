//! Decision matrix
//!
//! The first matching row wins:
//!
//! | Condition                        | Verdict  | Review priority             |
//! |----------------------------------|----------|-----------------------------|
//! | any CRITICAL finding             | REJECTED | NONE                        |
//! | `final_score >= reject_threshold`| REJECTED | NONE                        |
//! | `final_score >= flag_threshold`  | FLAGGED  | HIGH at or above            |
//! |                                  |          | `high_priority_score`, else |
//! |                                  |          | MEDIUM                      |
//! | otherwise                        | APPROVED | NONE                        |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Thresholds;
use crate::finding::{CheckOutcome, Finding, Severity};
use crate::scorer::ScoreCard;

/// Number of findings quoted in the reasoning
const REASONING_FINDINGS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Approved,
    Flagged,
    Rejected,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Approved => "APPROVED",
            Verdict::Flagged => "FLAGGED",
            Verdict::Rejected => "REJECTED",
        };
        f.write_str(label)
    }
}

/// Urgency of the human review a claim needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewPriority {
    None,
    Low,
    Medium,
    High,
    Immediate,
}

/// How confident the engine is in its own verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub verdict: Verdict,
    pub review_priority: ReviewPriority,
    pub confidence_level: ConfidenceLevel,
    pub auto_approved: bool,
    pub requires_monitoring: bool,
    pub reasoning: String,
}

/// Maps scored outcomes to a verdict
///
/// # Arguments
///
/// * `outcomes` - All check outcomes, in registry order
/// * `card` - Scores computed from the same outcomes
/// * `thresholds` - Flag, reject and priority thresholds
///
/// # Returns
///
/// The verdict together with its priority, flags and reasoning
pub fn resolve(outcomes: &[CheckOutcome], card: &ScoreCard, thresholds: &Thresholds) -> Decision {
    let findings: Vec<&Finding> = outcomes.iter().filter_map(CheckOutcome::finding).collect();
    let critical = findings
        .iter()
        .filter(|f| f.severity() == Severity::Critical)
        .count();
    let final_score = card.final_score;

    let (verdict, review_priority, confidence_level, summary) = if critical > 0 {
        (
            Verdict::Rejected,
            ReviewPriority::None,
            ConfidenceLevel::High,
            format!("{critical} critical fraud indicator(s) detected."),
        )
    } else if final_score >= thresholds.reject_threshold {
        (
            Verdict::Rejected,
            ReviewPriority::None,
            ConfidenceLevel::High,
            format!("Multiple fraud indicators accumulated (severity score: {final_score})."),
        )
    } else if final_score >= thresholds.flag_threshold {
        let priority = if final_score >= thresholds.high_priority_score {
            ReviewPriority::High
        } else {
            ReviewPriority::Medium
        };
        (
            Verdict::Flagged,
            priority,
            ConfidenceLevel::Medium,
            format!("Verification issues require human review (severity score: {final_score})."),
        )
    } else if findings.is_empty() {
        (
            Verdict::Approved,
            ReviewPriority::None,
            ConfidenceLevel::High,
            format!("All {} verification checks passed.", card.total_checks),
        )
    } else {
        (
            Verdict::Approved,
            ReviewPriority::None,
            ConfidenceLevel::Medium,
            "Minor verification issues within acceptable range.".to_string(),
        )
    };

    let approved = verdict == Verdict::Approved;
    Decision {
        verdict,
        review_priority,
        confidence_level,
        auto_approved: approved,
        requires_monitoring: approved && !findings.is_empty(),
        reasoning: reasoning(verdict, &summary, &findings),
    }
}

/// The most severe findings, ties broken by check order
pub fn top_findings<'a>(findings: &[&'a Finding], limit: usize) -> Vec<&'a Finding> {
    let mut ranked = findings.to_vec();
    // stable sort keeps registry order within a severity
    ranked.sort_by(|a, b| b.severity().cmp(&a.severity()));
    ranked.truncate(limit);
    ranked
}

fn reasoning(verdict: Verdict, summary: &str, findings: &[&Finding]) -> String {
    let mut text = format!("{verdict}: {summary}");
    let top = top_findings(findings, REASONING_FINDINGS);
    if !top.is_empty() {
        let quoted = top
            .iter()
            .map(|f| format!("[{}] {}", f.rule_id(), f.reason()))
            .collect::<Vec<_>>()
            .join(" | ");
        text.push_str(" Key findings: ");
        text.push_str(&quoted);
    }
    text
}
