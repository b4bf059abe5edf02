//! Phase D: is the claimed amount plausible

use core_kernel::Money;
use rust_decimal_macros::dec;

use crate::checks::{CheckContext, Issues};
use crate::finding::{CheckId, Finding, FindingCategory, Severity};

/// Check 13: amounts above the fast-track ceiling need a human
pub fn amount_threshold(ctx: &CheckContext<'_>) -> Option<Finding> {
    let claimed = ctx.bundle.claimed_amount();
    let ceiling = Money::new(ctx.config.auto_approval_ceiling, claimed.currency());
    if !claimed.exceeds(&ceiling) {
        return None;
    }

    Some(
        Finding::new(
            CheckId::AmountThreshold,
            "AMOUNT_EXCEEDS_AUTO_APPROVAL",
            FindingCategory::Financial,
            Severity::Medium,
            format!("Claimed {claimed} exceeds the {ceiling} auto-approval ceiling"),
        )
        .with_action("Route to manual approval; not eligible for fast-track payout"),
    )
}

/// Check 14: claimed amount against detected damage and the cost estimate
pub fn damage_cost_sanity(ctx: &CheckContext<'_>) -> Option<Finding> {
    let claimed = ctx.bundle.claimed_amount();
    let mut issues = Issues::new(CheckId::DamageCostSanity);

    if !ctx.bundle.damage().detected && claimed.is_positive() {
        issues.push(
            Severity::Critical,
            "CLAIM_NO_DAMAGE_DETECTED",
            FindingCategory::Financial,
            format!("Claimed {claimed} but no damage was detected in the photos"),
        );
        return issues.into_finding();
    }

    let estimate = ctx.bundle.cost_estimate()?;
    if estimate.max.is_zero() {
        return None;
    }

    let ratio = ctx.config.max_claim_to_estimate_ratio;
    // a limit too large to represent cannot be exceeded
    let inflated = estimate
        .max
        .checked_multiply(ratio)
        .is_ok_and(|limit| claimed.exceeds(&limit));
    let midpoint = estimate.midpoint();
    let below_floor = estimate
        .min
        .checked_multiply(dec!(0.5))
        .is_ok_and(|floor| floor.exceeds(&claimed));

    if inflated {
        let multiple = claimed
            .ratio_to(&estimate.max)
            .map(|r| format!("{:.1}x", r.round_dp(1)))
            .unwrap_or_default();
        issues.push(
            Severity::High,
            "CLAIM_INFLATED",
            FindingCategory::Financial,
            format!(
                "Claimed {claimed} is {multiple} the estimate maximum {} (limit {ratio}x)",
                estimate.max
            ),
        );
    } else if claimed.exceeds(&midpoint) {
        issues.push(
            Severity::Low,
            "CLAIM_ABOVE_ESTIMATE",
            FindingCategory::Financial,
            format!(
                "Claimed {claimed} is above the estimate midpoint {midpoint} (range {} to {})",
                estimate.min, estimate.max
            ),
        );
    } else if below_floor {
        issues.push(
            Severity::Low,
            "CLAIM_SUSPICIOUSLY_LOW",
            FindingCategory::Financial,
            format!(
                "Claimed {claimed} is under half the estimate minimum {}",
                estimate.min
            ),
        );
    }

    issues.into_finding()
}

pub fn damage_cost_note(ctx: &CheckContext<'_>) -> Option<String> {
    ctx.bundle
        .cost_estimate()
        .is_none()
        .then(|| "No cost estimate supplied".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::CostEstimate;
    use crate::testing::run_check;
    use core_kernel::Currency;

    fn inr(units: i64) -> Money {
        Money::from_major(units, Currency::INR)
    }

    mod amount_threshold_tests {
        use super::*;

        #[test]
        fn test_at_ceiling_passes() {
            let finding = run_check(amount_threshold, |b, _| b.claimed_amount = inr(20_000));
            assert!(finding.is_none());
        }

        #[test]
        fn test_above_ceiling_is_medium() {
            let finding = run_check(amount_threshold, |b, _| b.claimed_amount = inr(20_001)).unwrap();
            assert_eq!(finding.severity(), Severity::Medium);
            assert_eq!(finding.category(), FindingCategory::Financial);
        }
    }

    mod cost_sanity_tests {
        use super::*;

        #[test]
        fn test_no_damage_with_claim_is_critical() {
            let finding = run_check(damage_cost_sanity, |b, _| {
                b.damage.detected = false;
                b.claimed_amount = inr(15_000);
            })
            .unwrap();
            assert_eq!(finding.severity(), Severity::Critical);
            assert_eq!(finding.rule_id(), "CLAIM_NO_DAMAGE_DETECTED");
        }

        #[test]
        fn test_no_damage_zero_claim_passes() {
            let finding = run_check(damage_cost_sanity, |b, _| {
                b.damage.detected = false;
                b.claimed_amount = inr(0);
                b.cost_estimate = None;
            });
            assert!(finding.is_none());
        }

        #[test]
        fn test_inflated_claim_is_high() {
            // estimate max 8000, ratio 2.0
            let finding = run_check(damage_cost_sanity, |b, _| b.claimed_amount = inr(16_001)).unwrap();
            assert_eq!(finding.severity(), Severity::High);
            assert_eq!(finding.rule_id(), "CLAIM_INFLATED");
        }

        #[test]
        fn test_exactly_at_ratio_limit_is_low() {
            let finding = run_check(damage_cost_sanity, |b, _| b.claimed_amount = inr(16_000)).unwrap();
            assert_eq!(finding.severity(), Severity::Low);
            assert_eq!(finding.rule_id(), "CLAIM_ABOVE_ESTIMATE");
        }

        #[test]
        fn test_within_lower_half_passes() {
            let finding = run_check(damage_cost_sanity, |b, _| b.claimed_amount = inr(6_000));
            assert!(finding.is_none());
        }

        #[test]
        fn test_under_declared_claim_is_low() {
            let finding = run_check(damage_cost_sanity, |b, _| b.claimed_amount = inr(1_500)).unwrap();
            assert_eq!(finding.severity(), Severity::Low);
            assert_eq!(finding.rule_id(), "CLAIM_SUSPICIOUSLY_LOW");
        }

        #[test]
        fn test_missing_estimate_passes() {
            let finding = run_check(damage_cost_sanity, |b, _| {
                b.cost_estimate = None;
                b.claimed_amount = inr(90_000);
            });
            assert!(finding.is_none());
        }

        #[test]
        fn test_zero_estimate_is_skipped() {
            let finding = run_check(damage_cost_sanity, |b, _| {
                b.cost_estimate = Some(CostEstimate {
                    min: inr(0),
                    max: inr(0),
                });
            });
            assert!(finding.is_none());
        }
    }
}
