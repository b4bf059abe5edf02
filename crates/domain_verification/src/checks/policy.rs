//! Phase E: the policy on file and the claimant's history

use core_kernel::temporal::within_lookback;

use crate::checks::{normalize_plate, plates_partially_match, CheckContext, Issues};
use crate::finding::{CheckId, Finding, FindingCategory, Severity};
use crate::reference::{PolicyStatus, PriorClaim};

/// Check 15: the policy must be in force and cover the amount
pub fn policy_coverage(ctx: &CheckContext<'_>) -> Option<Finding> {
    let policy = ctx.reference.policy();
    let claim = ctx.bundle.claim();
    let claimed = ctx.bundle.claimed_amount();
    let mut issues = Issues::new(CheckId::PolicyCoverage);

    if policy.status != PolicyStatus::Active {
        issues.push(
            Severity::Critical,
            "POLICY_INACTIVE",
            FindingCategory::Policy,
            format!("Policy {} is {}", policy.policy_id, policy.status),
        );
    }

    if !policy.validity.contains_instant(claim.incident_at) {
        issues.push(
            Severity::Critical,
            "INCIDENT_OUTSIDE_COVERAGE",
            FindingCategory::Policy,
            format!(
                "Incident on {} falls outside the policy period {}",
                claim.incident_at.date_naive(),
                policy.validity
            ),
        );
    }

    match claimed.checked_cmp(&policy.coverage_ceiling) {
        Ok(std::cmp::Ordering::Greater) => issues.push(
            Severity::Critical,
            "EXCEEDS_COVERAGE",
            FindingCategory::Policy,
            format!(
                "Claimed {claimed} exceeds the coverage ceiling {}",
                policy.coverage_ceiling
            ),
        ),
        Ok(_) => {}
        Err(_) => issues.push_with_action(
            Severity::Medium,
            "COVERAGE_NOT_COMPARABLE",
            FindingCategory::Policy,
            format!(
                "Claim currency {} differs from the coverage currency {}",
                claimed.currency(),
                policy.coverage_ceiling.currency()
            ),
            "Adjuster to confirm the coverage limit in the claim currency",
        ),
    }

    issues.into_finding()
}

/// Check 16: repeat or overlapping claims for the same vehicle or policyholder
pub fn duplicate_claim(ctx: &CheckContext<'_>) -> Option<Finding> {
    let claim = ctx.bundle.claim();
    let read_plate = ctx
        .bundle
        .identity()
        .plate_text
        .as_deref()
        .map(normalize_plate)
        .filter(|plate| !plate.is_empty());
    let plate = read_plate.unwrap_or_else(|| normalize_plate(&ctx.reference.policy().vehicle.plate));
    let lookback = ctx.config.duplicate_lookback_days;
    let min_len = ctx.config.min_partial_plate_length;
    let same_vehicle = |prior: &PriorClaim| {
        let prior_plate = normalize_plate(&prior.plate);
        prior_plate == plate || plates_partially_match(&plate, &prior_plate, min_len)
    };

    let related: Vec<&PriorClaim> = ctx
        .reference
        .claim_history()
        .iter()
        .filter(|prior| prior.claim_id != claim.claim_id)
        .filter(|prior| prior.policyholder_id == claim.policyholder_id || same_vehicle(prior))
        .collect();

    let recent: Vec<&PriorClaim> = related
        .iter()
        .copied()
        .filter(|prior| !prior.status.is_rejected())
        .filter(|prior| within_lookback(prior.filed_at, claim.submitted_at, lookback))
        .collect();
    let open: Vec<&PriorClaim> = related
        .iter()
        .copied()
        .filter(|prior| prior.policyholder_id == claim.policyholder_id)
        .filter(|prior| prior.status.is_open())
        .collect();

    let mut issues = Issues::new(CheckId::DuplicateClaim);
    if !recent.is_empty() {
        let listed = recent
            .iter()
            .map(|prior| format!("{} filed {} ({})", prior.claim_id, prior.filed_at.date_naive(), prior.status))
            .collect::<Vec<_>>()
            .join(", ");
        issues.push(
            Severity::High,
            "DUPLICATE_RECENT_CLAIM",
            FindingCategory::SuspiciousPattern,
            format!(
                "{} other claim(s) for this vehicle or policyholder in the last {lookback} days: {listed}",
                recent.len()
            ),
        );
    }
    if !open.is_empty() {
        let listed = open
            .iter()
            .map(|prior| format!("{} ({})", prior.claim_id, prior.status))
            .collect::<Vec<_>>()
            .join(", ");
        issues.push(
            Severity::High,
            "OPEN_CLAIM_EXISTS",
            FindingCategory::SuspiciousPattern,
            format!("{} claim(s) still awaiting a decision: {listed}", open.len()),
        );
    }

    issues.into_finding()
}
