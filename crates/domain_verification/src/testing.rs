//! Clean inputs for the unit tests in this crate
//!
//! Integration tests use the `test_utils` crate instead; the in-crate tests
//! cannot, because that crate links its own copy of this one.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use core_kernel::{ClaimId, Currency, DateRange, Money, PartyId, PolicyId};

use crate::checks::{CheckContext, CheckFn};
use crate::config::VerificationConfig;
use crate::facts::*;
use crate::finding::Finding;
use crate::reference::*;

/// A submission and policy on which every check passes
pub(crate) fn clean_inputs() -> (FactBundleParts, ReferenceDataParts) {
    let policyholder_id = PartyId::new();
    let incident_at = Utc.with_ymd_and_hms(2024, 6, 1, 15, 30, 0).unwrap();
    let submitted_at = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap();

    let parts = FactBundleParts {
        claim: ClaimContext {
            claim_id: ClaimId::new(),
            policyholder_id,
            submitted_at,
            incident_at,
            incident_location: Some(GeoPoint::new(18.5204, 73.8567)),
        },
        identity: IdentityFacts {
            make: Some("Maruti Suzuki".to_string()),
            model: Some("Swift".to_string()),
            year: Some(2021),
            color: Some("White".to_string()),
            detection_confidence: 0.93,
            plate_text: Some("MH12AB3456".to_string()),
            plate_confidence: 0.95,
            plate_visible: true,
            plate_obscured: false,
            vin: None,
        },
        damage: DamageFacts {
            detected: true,
            damage_type: Some("dent".to_string()),
            severity: DamageSeverity::Moderate,
            severity_score: 4.5,
            damaged_panels: vec!["front_bumper".to_string(), "hood".to_string()],
            impact_point: Some(ImpactPoint::Front),
            ..Default::default()
        },
        forensics: ForensicFacts::default(),
        scene: SceneFacts {
            location_type: Some(LocationType::Road),
            time_of_day: Some(TimeOfDay::Day),
            weather: Some(Weather::Clear),
            debris_present: true,
            other_vehicles_present: true,
        },
        metadata: CaptureMetadata {
            exif_timestamp: Some(incident_at + Duration::hours(1)),
            gps: Some(GeoPoint::new(18.5210, 73.8570)),
            distance_from_claimed_location_km: None,
        },
        narrative: "The car ahead braked suddenly at a signal and I hit the car in front.".to_string(),
        images: Vec::new(),
        object_detection: Some(DetectorSummary {
            damage_detected: true,
            severity: DamageSeverity::Moderate,
        }),
        claimed_amount: Money::from_major(5_000, Currency::INR),
        cost_estimate: Some(CostEstimate {
            min: Money::from_major(4_000, Currency::INR),
            max: Money::from_major(8_000, Currency::INR),
        }),
    };

    let reference = ReferenceDataParts {
        policy: PolicyRecord {
            policy_id: PolicyId::new(),
            policyholder_id,
            vehicle: VehicleOnFile {
                make: "Maruti Suzuki".to_string(),
                model: "Swift".to_string(),
                color: Some("white".to_string()),
                plate: "MH 12 AB 3456".to_string(),
                vin: Some("MA3EWDE1S00123456".to_string()),
            },
            status: PolicyStatus::Active,
            coverage_ceiling: Money::from_major(200_000, Currency::INR),
            validity: DateRange::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            )
            .unwrap(),
        },
        claim_history: Vec::new(),
    };

    (parts, reference)
}

/// Runs one check against edited clean inputs
pub(crate) fn run_check(
    check: CheckFn,
    edit: impl FnOnce(&mut FactBundleParts, &mut ReferenceDataParts),
) -> Option<Finding> {
    run_check_with(check, &VerificationConfig::default(), edit)
}

pub(crate) fn run_check_with(
    check: CheckFn,
    config: &VerificationConfig,
    edit: impl FnOnce(&mut FactBundleParts, &mut ReferenceDataParts),
) -> Option<Finding> {
    let (mut parts, mut reference) = clean_inputs();
    edit(&mut parts, &mut reference);
    let bundle = FactBundle::new(parts).unwrap();
    let reference = ReferenceData::try_from(reference).unwrap();
    check(&CheckContext::new(&bundle, &reference, config))
}
