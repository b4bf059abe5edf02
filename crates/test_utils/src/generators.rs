//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating verification inputs that
//! always pass construction-time validation, so properties can focus on
//! the engine rather than on rejected inputs.

use chrono::Duration;
use core_kernel::{ClaimId, Currency, Money, PartyId};
use domain_verification::facts::{
    DamageSeverity, DetectorSummary, FactBundleParts, ForensicFacts, ImageQuality, ImpactPoint,
    PreExistingIndicators, StockPhotoLikelihood,
};
use domain_verification::reference::{PriorClaim, PriorClaimStatus};
use domain_verification::{FactBundle, Severity};
use proptest::prelude::*;

use crate::fixtures::{FactFixtures, IdFixtures, TemporalFixtures, VehicleFixtures};

/// Strategy for generating severities
pub fn severity_strategy() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Low),
        Just(Severity::Medium),
        Just(Severity::High),
        Just(Severity::Critical),
    ]
}

pub fn damage_severity_strategy() -> impl Strategy<Value = DamageSeverity> {
    prop_oneof![
        Just(DamageSeverity::None),
        Just(DamageSeverity::Minor),
        Just(DamageSeverity::Moderate),
        Just(DamageSeverity::Severe),
        Just(DamageSeverity::Totaled),
    ]
}

pub fn impact_point_strategy() -> impl Strategy<Value = Option<ImpactPoint>> {
    prop::option::of(prop_oneof![
        Just(ImpactPoint::Front),
        Just(ImpactPoint::Rear),
        Just(ImpactPoint::Left),
        Just(ImpactPoint::Right),
        Just(ImpactPoint::Roof),
        Just(ImpactPoint::Multiple),
    ])
}

pub fn stock_photo_strategy() -> impl Strategy<Value = StockPhotoLikelihood> {
    prop_oneof![
        Just(StockPhotoLikelihood::Unknown),
        Just(StockPhotoLikelihood::Low),
        Just(StockPhotoLikelihood::Medium),
        Just(StockPhotoLikelihood::High),
        Just(StockPhotoLikelihood::VeryHigh),
    ]
}

/// Strategy for forensics flags, mostly clean
pub fn forensics_strategy() -> impl Strategy<Value = ForensicFacts> {
    (
        prop::bool::weighted(0.1),
        prop::bool::weighted(0.1),
        prop::bool::weighted(0.2),
        prop_oneof![Just(ImageQuality::High), Just(ImageQuality::Medium), Just(ImageQuality::Low)],
        prop::bool::weighted(0.1),
        stock_photo_strategy(),
    )
        .prop_map(|(screen, watermark, blurry, quality, editing, stock)| ForensicFacts {
            screen_recapture: screen,
            watermark,
            blurry,
            image_quality: quality,
            editing_detected: editing,
            stock_photo_likelihood: stock,
            ..Default::default()
        })
}

pub fn pre_existing_strategy() -> impl Strategy<Value = PreExistingIndicators> {
    (
        prop::bool::weighted(0.15),
        prop::bool::weighted(0.15),
        prop::bool::weighted(0.15),
        prop::bool::weighted(0.15),
    )
        .prop_map(|(rust, dirt, faded, repairs)| PreExistingIndicators {
            rust,
            dirt_in_damage: dirt,
            faded_paint: faded,
            old_repairs: repairs,
        })
}

/// Strategy for plate reads: the registered plate, a fragment, a foreign plate or nothing
pub fn plate_read_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        4 => Just(Some(VehicleFixtures::PLATE_READ.to_string())),
        1 => Just(Some("12AB3456".to_string())),
        1 => Just(Some(VehicleFixtures::FOREIGN_PLATE.to_string())),
        1 => Just(None),
    ]
}

/// Strategy for claimed amounts in whole rupees
pub fn claimed_amount_strategy() -> impl Strategy<Value = Money> {
    (0i64..60_000i64).prop_map(|units| Money::from_major(units, Currency::INR))
}

/// Strategy for confidences in 0..=1
pub fn confidence_strategy() -> impl Strategy<Value = f64> {
    (0u32..=100u32).prop_map(|n| f64::from(n) / 100.0)
}

/// Strategy for varied but always valid fact bundles
///
/// Starts from the clean fixture and perturbs the facts that drive the
/// checks, so generated bundles span clean approvals through multi-critical
/// rejections.
pub fn fact_bundle_strategy() -> impl Strategy<Value = FactBundle> {
    (
        forensics_strategy(),
        (
            any::<bool>(),
            damage_severity_strategy(),
            0u32..=100u32,
            impact_point_strategy(),
            pre_existing_strategy(),
        ),
        (plate_read_strategy(), confidence_strategy(), confidence_strategy()),
        (
            prop::option::of((any::<bool>(), damage_severity_strategy())),
            claimed_amount_strategy(),
            prop::bool::weighted(0.8),
            prop::bool::weighted(0.8),
            0i64..200i64,
        ),
    )
        .prop_map(
            |(
                forensics,
                (detected, severity, score_tenths, impact_point, pre_existing),
                (plate, plate_confidence, detection_confidence),
                (secondary, claimed, has_exif, has_gps, delay_hours),
            )| {
                let mut parts: FactBundleParts = FactFixtures::clean_parts();
                parts.forensics = forensics;
                parts.damage.detected = detected;
                parts.damage.severity = severity;
                parts.damage.severity_score = f64::from(score_tenths) / 10.0;
                parts.damage.impact_point = impact_point;
                parts.damage.pre_existing = pre_existing;
                parts.identity.plate_text = plate;
                parts.identity.plate_confidence = plate_confidence;
                parts.identity.detection_confidence = detection_confidence;
                parts.object_detection = secondary.map(|(damage_detected, severity)| DetectorSummary {
                    damage_detected,
                    severity,
                });
                parts.claimed_amount = claimed;
                parts.metadata.exif_timestamp =
                    has_exif.then(|| TemporalFixtures::incident_at() + Duration::hours(delay_hours));
                if !has_gps {
                    parts.metadata.gps = None;
                }
                FactBundle::new(parts).expect("generated facts stay within validated ranges")
            },
        )
}

pub fn prior_claim_status_strategy() -> impl Strategy<Value = PriorClaimStatus> {
    prop_oneof![
        Just(PriorClaimStatus::Pending),
        Just(PriorClaimStatus::Processing),
        Just(PriorClaimStatus::Approved),
        Just(PriorClaimStatus::Flagged),
        Just(PriorClaimStatus::Rejected),
        Just(PriorClaimStatus::Settled),
        Just(PriorClaimStatus::Closed),
    ]
}

/// Strategy for history entries, some related to the fixture claimant
pub fn prior_claim_strategy() -> impl Strategy<Value = PriorClaim> {
    (any::<bool>(), prior_claim_status_strategy(), 0i64..90i64).prop_map(
        |(same_holder, status, days_before)| PriorClaim {
            claim_id: ClaimId::new(),
            policyholder_id: if same_holder {
                IdFixtures::policyholder_id()
            } else {
                PartyId::new()
            },
            plate: if same_holder {
                VehicleFixtures::PLATE_READ.to_string()
            } else {
                "DL3CAF0001".to_string()
            },
            status,
            filed_at: TemporalFixtures::days_before_submission(days_before),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_bundles_are_valid(bundle in fact_bundle_strategy()) {
            prop_assert!(bundle.damage().severity_score <= 10.0);
            prop_assert!(!bundle.claimed_amount().is_negative());
        }

        #[test]
        fn confidences_stay_in_range(confidence in confidence_strategy()) {
            prop_assert!((0.0..=1.0).contains(&confidence));
        }

        #[test]
        fn unrelated_history_uses_other_plate(claim in prior_claim_strategy()) {
            if claim.policyholder_id != IdFixtures::policyholder_id() {
                prop_assert_ne!(claim.plate.as_str(), VehicleFixtures::PLATE_READ);
            }
        }
    }
}
