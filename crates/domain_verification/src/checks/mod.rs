//! The verification checks, grouped by phase
//!
//! Every check is a plain function from a [`CheckContext`] to an optional
//! [`Finding`]. Checks never see each other's output. When a check spots
//! several problems it reports them together in a single finding whose
//! severity is the worst one observed.

pub mod context;
pub mod financial;
pub mod integrity;
pub mod policy;
pub mod vehicle;

use crate::config::VerificationConfig;
use crate::facts::FactBundle;
use crate::finding::{CheckId, Finding, FindingCategory, Severity};
use crate::reference::ReferenceData;

/// Everything a check may read
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub bundle: &'a FactBundle,
    pub reference: &'a ReferenceData,
    pub config: &'a VerificationConfig,
}

impl<'a> CheckContext<'a> {
    pub fn new(
        bundle: &'a FactBundle,
        reference: &'a ReferenceData,
        config: &'a VerificationConfig,
    ) -> Self {
        Self {
            bundle,
            reference,
            config,
        }
    }
}

/// Signature shared by all checks
pub type CheckFn = fn(&CheckContext<'_>) -> Option<Finding>;

/// Optional explanation recorded when a check passes
pub type NoteFn = fn(&CheckContext<'_>) -> Option<String>;

struct Issue {
    severity: Severity,
    rule_id: &'static str,
    category: FindingCategory,
    detail: String,
    action: Option<&'static str>,
}

/// Problems collected by one check, folded into at most one finding
pub(crate) struct Issues {
    check: CheckId,
    items: Vec<Issue>,
}

impl Issues {
    pub(crate) fn new(check: CheckId) -> Self {
        Self {
            check,
            items: Vec::new(),
        }
    }

    pub(crate) fn push(
        &mut self,
        severity: Severity,
        rule_id: &'static str,
        category: FindingCategory,
        detail: impl Into<String>,
    ) {
        self.items.push(Issue {
            severity,
            rule_id,
            category,
            detail: detail.into(),
            action: None,
        });
    }

    /// Like [`Issues::push`] with an action more specific than the severity default
    pub(crate) fn push_with_action(
        &mut self,
        severity: Severity,
        rule_id: &'static str,
        category: FindingCategory,
        detail: impl Into<String>,
        action: &'static str,
    ) {
        self.items.push(Issue {
            severity,
            rule_id,
            category,
            detail: detail.into(),
            action: Some(action),
        });
    }

    /// Builds the finding from the most severe issue; ties go to the earliest
    pub(crate) fn into_finding(self) -> Option<Finding> {
        let mut primary: Option<&Issue> = None;
        for issue in &self.items {
            if primary.map_or(true, |p| issue.severity > p.severity) {
                primary = Some(issue);
            }
        }
        let primary = primary?;

        let reason = self
            .items
            .iter()
            .map(|issue| issue.detail.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        let finding = Finding::new(
            self.check,
            primary.rule_id,
            primary.category,
            primary.severity,
            reason,
        );
        Some(match primary.action {
            Some(action) => finding.with_action(action),
            None => finding,
        })
    }
}

/// Uppercases a plate and drops spaces, dashes and dots
pub fn normalize_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '.')
        .flat_map(char::to_uppercase)
        .collect()
}

/// True when one normalized plate is a long-enough fragment of the other
pub fn plates_partially_match(a: &str, b: &str, min_len: usize) -> bool {
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    shorter.len() >= min_len && longer.contains(shorter)
}

pub(crate) fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Case-insensitive match where either label may contain the other
pub fn labels_match(a: &str, b: &str) -> bool {
    let a = normalize_label(a);
    let b = normalize_label(b);
    !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a))
}

/// A trimmed, non-empty view of an optional label
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate("mh 12-ab.3456"), "MH12AB3456");
        assert_eq!(normalize_plate("  "), "");
    }

    #[test]
    fn test_partial_plate_match() {
        assert!(plates_partially_match("12AB3456", "MH12AB3456", 4));
        assert!(plates_partially_match("MH12AB3456", "3456", 4));
        assert!(!plates_partially_match("456", "MH12AB3456", 4));
        assert!(!plates_partially_match("KA01", "MH12AB3456", 4));
    }

    #[test]
    fn test_labels_match_by_containment() {
        assert!(labels_match("Maruti Suzuki", "maruti"));
        assert!(labels_match("Swift", "Swift Dzire"));
        assert!(!labels_match("Hyundai", "Honda"));
        assert!(!labels_match("", "Honda"));
    }

    #[test]
    fn test_issues_pick_worst_and_list_all() {
        let mut issues = Issues::new(CheckId::Metadata);
        issues.push(Severity::Low, "GPS_MISSING", FindingCategory::MetadataIssue, "no gps");
        issues.push(Severity::High, "METADATA_MISSING", FindingCategory::MetadataIssue, "no exif");
        issues.push(Severity::High, "OTHER_HIGH", FindingCategory::MetadataIssue, "later high");

        let finding = issues.into_finding().unwrap();
        assert_eq!(finding.severity(), Severity::High);
        assert_eq!(finding.rule_id(), "METADATA_MISSING");
        assert_eq!(finding.reason(), "no gps; no exif; later high");
    }

    #[test]
    fn test_no_issues_no_finding() {
        assert!(Issues::new(CheckId::VinMatch).into_finding().is_none());
    }
}
