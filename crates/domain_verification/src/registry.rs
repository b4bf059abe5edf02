//! The ordered check registry
//!
//! The registry is a fixed table rather than something callers can extend:
//! the set of checks and their order are part of what makes two evaluations
//! comparable.

use tracing::debug;

use crate::checks::{context, financial, integrity, policy, vehicle, CheckContext, CheckFn, NoteFn};
use crate::finding::{CheckId, CheckOutcome};

/// A check and the function that implements it
#[derive(Clone, Copy)]
pub struct RegisteredCheck {
    pub id: CheckId,
    pub run: CheckFn,
    /// Explains a pass when there was nothing to verify
    pub note: Option<NoteFn>,
}

impl std::fmt::Debug for RegisteredCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredCheck").field("id", &self.id).finish()
    }
}

const fn check(id: CheckId, run: CheckFn) -> RegisteredCheck {
    RegisteredCheck { id, run, note: None }
}

const fn noted(id: CheckId, run: CheckFn, note: NoteFn) -> RegisteredCheck {
    RegisteredCheck {
        id,
        run,
        note: Some(note),
    }
}

static REGISTRY: [RegisteredCheck; CheckId::COUNT] = [
    check(CheckId::ImageQuality, integrity::image_quality),
    check(CheckId::Metadata, integrity::metadata),
    check(CheckId::ReverseImage, integrity::reverse_image),
    check(CheckId::DigitalForgery, integrity::digital_forgery),
    check(CheckId::VehicleMatch, vehicle::vehicle_match),
    noted(CheckId::LicensePlate, vehicle::license_plate, vehicle::license_plate_note),
    noted(CheckId::VinMatch, vehicle::vin_match, vehicle::vin_match_note),
    check(CheckId::PreExistingDamage, vehicle::pre_existing_damage),
    noted(
        CheckId::DamageCorroboration,
        vehicle::damage_corroboration,
        vehicle::damage_corroboration_note,
    ),
    check(CheckId::TotalLossMarkers, vehicle::total_loss_markers),
    check(CheckId::NarrativeConsistency, context::narrative_consistency),
    noted(
        CheckId::MultiImageConsistency,
        context::multi_image_consistency,
        context::multi_image_note,
    ),
    check(CheckId::AmountThreshold, financial::amount_threshold),
    noted(
        CheckId::DamageCostSanity,
        financial::damage_cost_sanity,
        financial::damage_cost_note,
    ),
    check(CheckId::PolicyCoverage, policy::policy_coverage),
    check(CheckId::DuplicateClaim, policy::duplicate_claim),
];

/// All registered checks in execution order
pub fn checks() -> &'static [RegisteredCheck] {
    &REGISTRY
}

/// Runs every check once, in order, and records each outcome
pub fn run_all(ctx: &CheckContext<'_>) -> Vec<CheckOutcome> {
    let mut outcomes = Vec::with_capacity(REGISTRY.len());
    for registered in &REGISTRY {
        let outcome = match (registered.run)(ctx) {
            Some(finding) => {
                debug!(
                    check = %registered.id,
                    rule_id = finding.rule_id(),
                    severity = %finding.severity(),
                    "Check failed"
                );
                CheckOutcome::Failed(finding)
            }
            None => CheckOutcome::Passed {
                check: registered.id,
                phase: registered.id.phase(),
                note: registered.note.and_then(|note| note(ctx)),
            },
        };
        outcomes.push(outcome);
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VerificationConfig;
    use crate::facts::FactBundle;
    use crate::reference::ReferenceData;
    use crate::testing::clean_inputs;

    #[test]
    fn test_registry_matches_check_order() {
        let ids: Vec<CheckId> = checks().iter().map(|c| c.id).collect();
        assert_eq!(ids, CheckId::ALL.to_vec());
    }

    #[test]
    fn test_clean_inputs_pass_every_check() {
        let (parts, reference) = clean_inputs();
        let bundle = FactBundle::new(parts).unwrap();
        let reference = ReferenceData::try_from(reference).unwrap();
        let config = VerificationConfig::default();

        let outcomes = run_all(&CheckContext::new(&bundle, &reference, &config));
        assert_eq!(outcomes.len(), CheckId::COUNT);
        for (outcome, expected) in outcomes.iter().zip(CheckId::ALL) {
            assert_eq!(outcome.check(), expected);
            assert!(outcome.is_passed(), "{expected} failed: {:?}", outcome.finding());
        }
    }

    #[test]
    fn test_pass_notes_recorded() {
        let (parts, reference) = clean_inputs();
        let bundle = FactBundle::new(parts).unwrap();
        let reference = ReferenceData::try_from(reference).unwrap();
        let config = VerificationConfig::default();

        let outcomes = run_all(&CheckContext::new(&bundle, &reference, &config));
        let vin = outcomes.iter().find(|o| o.check() == CheckId::VinMatch).unwrap();
        assert!(matches!(
            vin,
            CheckOutcome::Passed { note: Some(note), .. } if note.contains("chassis")
        ));
        let plate = outcomes.iter().find(|o| o.check() == CheckId::LicensePlate).unwrap();
        assert!(matches!(plate, CheckOutcome::Passed { note: None, .. }));
    }
}
