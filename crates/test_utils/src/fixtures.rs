//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for a single, consistent claim: a white
//! Maruti Suzuki Swift, registration MH12AB3456, damaged at the front in
//! Pune on 1 June 2024 and claimed the next morning. Every check passes on
//! the fixture bundle and policy.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use core_kernel::{ClaimId, Currency, DateRange, Money, PartyId, PolicyId};
use domain_verification::facts::{
    CaptureMetadata, ClaimContext, CostEstimate, DamageFacts, DamageSeverity, DetectorSummary,
    FactBundleParts, ForensicFacts, GeoPoint, IdentityFacts, ImpactPoint, LocationType,
    SceneFacts, TimeOfDay, Weather,
};
use domain_verification::reference::{PolicyRecord, PolicyStatus, VehicleOnFile};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// The default claimed amount, below the estimate midpoint
    pub fn claimed() -> Money {
        Money::new(dec!(5000), Currency::INR)
    }

    pub fn estimate_min() -> Money {
        Money::new(dec!(4000), Currency::INR)
    }

    pub fn estimate_max() -> Money {
        Money::new(dec!(8000), Currency::INR)
    }

    pub fn coverage_ceiling() -> Money {
        Money::new(dec!(200000), Currency::INR)
    }

    /// Shorthand for whole rupees
    pub fn inr(units: i64) -> Money {
        Money::from_major(units, Currency::INR)
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Incident time (1 June 2024, 15:30 UTC)
    pub fn incident_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 15, 30, 0).unwrap()
    }

    /// Submission time (2 June 2024, 09:00 UTC)
    pub fn submitted_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap()
    }

    /// Photo capture time, one hour after the incident
    pub fn captured_at() -> DateTime<Utc> {
        Self::incident_at() + Duration::hours(1)
    }

    /// Calendar year 2024, both ends inclusive
    pub fn policy_window() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
        .unwrap()
    }

    /// `days` before submission
    pub fn days_before_submission(days: i64) -> DateTime<Utc> {
        Self::submitted_at() - Duration::days(days)
    }
}

/// Fixture for identifiers
///
/// Fixed UUIDs keep serialized results comparable across test runs.
pub struct IdFixtures;

impl IdFixtures {
    pub fn claim_id() -> ClaimId {
        ClaimId::from_uuid(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0001))
    }

    pub fn policyholder_id() -> PartyId {
        PartyId::from_uuid(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0002))
    }

    pub fn policy_id() -> PolicyId {
        PolicyId::from_uuid(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0003))
    }
}

/// Fixture for the insured vehicle
pub struct VehicleFixtures;

impl VehicleFixtures {
    pub const MAKE: &'static str = "Maruti Suzuki";
    pub const MODEL: &'static str = "Swift";
    pub const COLOR: &'static str = "White";
    /// Registered plate as printed on the policy schedule
    pub const PLATE: &'static str = "MH 12 AB 3456";
    pub const PLATE_READ: &'static str = "MH12AB3456";
    pub const FOREIGN_PLATE: &'static str = "KA01XY9876";
    pub const VIN: &'static str = "MA3EWDE1S00123456";

    pub fn on_file() -> VehicleOnFile {
        VehicleOnFile {
            make: Self::MAKE.to_string(),
            model: Self::MODEL.to_string(),
            color: Some(Self::COLOR.to_lowercase()),
            plate: Self::PLATE.to_string(),
            vin: Some(Self::VIN.to_string()),
        }
    }

    pub fn identity() -> IdentityFacts {
        IdentityFacts {
            make: Some(Self::MAKE.to_string()),
            model: Some(Self::MODEL.to_string()),
            year: Some(2021),
            color: Some(Self::COLOR.to_string()),
            detection_confidence: 0.93,
            plate_text: Some(Self::PLATE_READ.to_string()),
            plate_confidence: 0.95,
            plate_visible: true,
            plate_obscured: false,
            vin: None,
        }
    }
}

/// Fixture for the extracted facts
pub struct FactFixtures;

impl FactFixtures {
    /// Pune city centre
    pub fn incident_location() -> GeoPoint {
        GeoPoint::new(18.5204, 73.8567)
    }

    pub const NARRATIVE: &'static str =
        "The car ahead braked suddenly at a signal and I hit the car in front.";

    pub fn damage() -> DamageFacts {
        DamageFacts {
            detected: true,
            damage_type: Some("dent".to_string()),
            severity: DamageSeverity::Moderate,
            severity_score: 4.5,
            damaged_panels: vec!["front_bumper".to_string(), "hood".to_string()],
            impact_point: Some(ImpactPoint::Front),
            ..Default::default()
        }
    }

    pub fn scene() -> SceneFacts {
        SceneFacts {
            location_type: Some(LocationType::Road),
            time_of_day: Some(TimeOfDay::Day),
            weather: Some(Weather::Clear),
            debris_present: true,
            other_vehicles_present: true,
        }
    }

    pub fn metadata() -> CaptureMetadata {
        CaptureMetadata {
            exif_timestamp: Some(TemporalFixtures::captured_at()),
            gps: Some(GeoPoint::new(18.5210, 73.8570)),
            distance_from_claimed_location_km: None,
        }
    }

    pub fn cost_estimate() -> CostEstimate {
        CostEstimate {
            min: MoneyFixtures::estimate_min(),
            max: MoneyFixtures::estimate_max(),
        }
    }

    /// A submission on which every check passes
    pub fn clean_parts() -> FactBundleParts {
        FactBundleParts {
            claim: ClaimContext {
                claim_id: IdFixtures::claim_id(),
                policyholder_id: IdFixtures::policyholder_id(),
                submitted_at: TemporalFixtures::submitted_at(),
                incident_at: TemporalFixtures::incident_at(),
                incident_location: Some(Self::incident_location()),
            },
            identity: VehicleFixtures::identity(),
            damage: Self::damage(),
            forensics: ForensicFixtures::clean(),
            scene: Self::scene(),
            metadata: Self::metadata(),
            narrative: Self::NARRATIVE.to_string(),
            images: Vec::new(),
            object_detection: Some(DetectorSummary {
                damage_detected: true,
                severity: DamageSeverity::Moderate,
            }),
            claimed_amount: MoneyFixtures::claimed(),
            cost_estimate: Some(Self::cost_estimate()),
        }
    }
}

/// Fixture for image forensics
pub struct ForensicFixtures;

impl ForensicFixtures {
    pub fn clean() -> ForensicFacts {
        ForensicFacts::default()
    }

    /// A photo of a screen showing someone else's photo
    pub fn screen_recapture() -> ForensicFacts {
        ForensicFacts {
            screen_recapture: true,
            ui_elements: true,
            ..Default::default()
        }
    }
}

/// Fixture for the policy on file
pub struct PolicyFixtures;

impl PolicyFixtures {
    pub fn active() -> PolicyRecord {
        PolicyRecord {
            policy_id: IdFixtures::policy_id(),
            policyholder_id: IdFixtures::policyholder_id(),
            vehicle: VehicleFixtures::on_file(),
            status: PolicyStatus::Active,
            coverage_ceiling: MoneyFixtures::coverage_ceiling(),
            validity: TemporalFixtures::policy_window(),
        }
    }
}
