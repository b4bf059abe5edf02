//! Test Data Builders
//!
//! Provides builder patterns for constructing verification inputs with
//! sensible defaults. Every builder starts from the clean fixtures, so a
//! test only spells out the facts it is about.

use chrono::{DateTime, Utc};
use core_kernel::{ClaimId, DateRange, ImageId, Money, PartyId};
use domain_verification::facts::{
    CostEstimate, DamageSeverity, DetectorSummary, FactBundleParts, ForensicFacts, GeoPoint,
    ImageObservation, ImpactPoint, Lighting, OcrReading, PreExistingIndicators,
    StockPhotoLikelihood,
};
use domain_verification::reference::{PolicyRecord, PolicyStatus, PriorClaim, PriorClaimStatus};
use domain_verification::{FactBundle, ReferenceData, ValidationError};

use crate::fixtures::{FactFixtures, IdFixtures, PolicyFixtures, TemporalFixtures, VehicleFixtures};

/// Builder for fact bundles
pub struct FactBundleBuilder {
    parts: FactBundleParts,
}

impl Default for FactBundleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FactBundleBuilder {
    /// Creates a new builder from the clean fixture
    pub fn new() -> Self {
        Self {
            parts: FactFixtures::clean_parts(),
        }
    }

    pub fn with_claim_id(mut self, id: ClaimId) -> Self {
        self.parts.claim.claim_id = id;
        self
    }

    pub fn with_policyholder_id(mut self, id: PartyId) -> Self {
        self.parts.claim.policyholder_id = id;
        self
    }

    pub fn with_incident_at(mut self, at: DateTime<Utc>) -> Self {
        self.parts.claim.incident_at = at;
        self
    }

    pub fn with_submitted_at(mut self, at: DateTime<Utc>) -> Self {
        self.parts.claim.submitted_at = at;
        self
    }

    pub fn with_claimed_amount(mut self, amount: Money) -> Self {
        self.parts.claimed_amount = amount;
        self
    }

    pub fn with_cost_estimate(mut self, min: Money, max: Money) -> Self {
        self.parts.cost_estimate = Some(CostEstimate { min, max });
        self
    }

    pub fn without_cost_estimate(mut self) -> Self {
        self.parts.cost_estimate = None;
        self
    }

    /// Marks the photos as showing no damage, for both detectors
    pub fn with_no_damage(mut self) -> Self {
        self.parts.damage.detected = false;
        self.parts.damage.severity = DamageSeverity::None;
        self.parts.damage.severity_score = 0.0;
        self.parts.damage.damaged_panels.clear();
        self.parts.damage.impact_point = None;
        self.parts.object_detection = Some(DetectorSummary {
            damage_detected: false,
            severity: DamageSeverity::None,
        });
        self
    }

    pub fn with_damage_severity(mut self, severity: DamageSeverity, score: f64) -> Self {
        self.parts.damage.severity = severity;
        self.parts.damage.severity_score = score;
        self
    }

    pub fn with_impact_point(mut self, point: Option<ImpactPoint>) -> Self {
        self.parts.damage.impact_point = point;
        self
    }

    pub fn with_pre_existing(mut self, indicators: PreExistingIndicators) -> Self {
        self.parts.damage.pre_existing = indicators;
        self
    }

    pub fn with_secondary_detector(mut self, summary: Option<DetectorSummary>) -> Self {
        self.parts.object_detection = summary;
        self
    }

    pub fn with_plate(mut self, plate: Option<&str>) -> Self {
        self.parts.identity.plate_text = plate.map(str::to_string);
        self
    }

    pub fn with_plate_confidence(mut self, confidence: f64) -> Self {
        self.parts.identity.plate_confidence = confidence;
        self
    }

    pub fn with_vehicle(mut self, make: &str, model: &str) -> Self {
        self.parts.identity.make = Some(make.to_string());
        self.parts.identity.model = Some(model.to_string());
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.parts.identity.color = Some(color.to_string());
        self
    }

    pub fn with_vin(mut self, text: Option<&str>, confidence: f64) -> Self {
        self.parts.identity.vin = Some(OcrReading {
            text: text.map(str::to_string),
            confidence,
        });
        self
    }

    pub fn with_forensics(mut self, forensics: ForensicFacts) -> Self {
        self.parts.forensics = forensics;
        self
    }

    pub fn with_stock_photo_likelihood(mut self, likelihood: StockPhotoLikelihood) -> Self {
        self.parts.forensics.stock_photo_likelihood = likelihood;
        self
    }

    pub fn with_exif_timestamp(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.parts.metadata.exif_timestamp = at;
        self
    }

    pub fn with_gps(mut self, gps: Option<GeoPoint>) -> Self {
        self.parts.metadata.gps = gps;
        self
    }

    pub fn with_narrative(mut self, narrative: &str) -> Self {
        self.parts.narrative = narrative.to_string();
        self
    }

    pub fn with_image(mut self, image: ImageObservation) -> Self {
        self.parts.images.push(image);
        self
    }

    /// Gives access to any fact the named setters do not cover
    pub fn with_parts(mut self, edit: impl FnOnce(&mut FactBundleParts)) -> Self {
        edit(&mut self.parts);
        self
    }

    pub fn parts(self) -> FactBundleParts {
        self.parts
    }

    pub fn try_build(self) -> Result<FactBundle, ValidationError> {
        FactBundle::new(self.parts)
    }

    /// Builds the bundle, panicking if the facts are invalid
    pub fn build(self) -> FactBundle {
        self.try_build().expect("test fact bundle should be valid")
    }
}

/// Builder for a single per-image observation
pub struct ImageObservationBuilder {
    image: ImageObservation,
}

impl Default for ImageObservationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageObservationBuilder {
    pub fn new() -> Self {
        Self {
            image: ImageObservation {
                image_id: ImageId::new(),
                plate_text: Some(VehicleFixtures::PLATE_READ.to_string()),
                vehicle_color: Some(VehicleFixtures::COLOR.to_string()),
                vehicle_make: Some(VehicleFixtures::MAKE.to_string()),
                lighting: Some(Lighting::Daylight),
                impact_point: Some(ImpactPoint::Front),
            },
        }
    }

    pub fn with_plate(mut self, plate: &str) -> Self {
        self.image.plate_text = Some(plate.to_string());
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.image.vehicle_color = Some(color.to_string());
        self
    }

    pub fn with_make(mut self, make: &str) -> Self {
        self.image.vehicle_make = Some(make.to_string());
        self
    }

    pub fn with_lighting(mut self, lighting: Lighting) -> Self {
        self.image.lighting = Some(lighting);
        self
    }

    pub fn with_impact_point(mut self, point: ImpactPoint) -> Self {
        self.image.impact_point = Some(point);
        self
    }

    pub fn build(self) -> ImageObservation {
        self.image
    }
}

/// Builder for reference data
pub struct ReferenceDataBuilder {
    policy: PolicyRecord,
    history: Vec<PriorClaim>,
}

impl Default for ReferenceDataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceDataBuilder {
    /// Creates a new builder around the active fixture policy
    pub fn new() -> Self {
        Self {
            policy: PolicyFixtures::active(),
            history: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: PolicyStatus) -> Self {
        self.policy.status = status;
        self
    }

    pub fn with_validity(mut self, validity: DateRange) -> Self {
        self.policy.validity = validity;
        self
    }

    pub fn with_coverage_ceiling(mut self, ceiling: Money) -> Self {
        self.policy.coverage_ceiling = ceiling;
        self
    }

    pub fn with_registered_plate(mut self, plate: &str) -> Self {
        self.policy.vehicle.plate = plate.to_string();
        self
    }

    pub fn with_registered_vin(mut self, vin: Option<&str>) -> Self {
        self.policy.vehicle.vin = vin.map(str::to_string);
        self
    }

    pub fn with_prior_claim(mut self, claim: PriorClaim) -> Self {
        self.history.push(claim);
        self
    }

    pub fn try_build(self) -> Result<ReferenceData, ValidationError> {
        ReferenceData::new(self.policy, self.history)
    }

    pub fn build(self) -> ReferenceData {
        self.try_build().expect("test reference data should be valid")
    }
}

/// Builder for entries in the claim history
pub struct PriorClaimBuilder {
    claim: PriorClaim,
}

impl Default for PriorClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorClaimBuilder {
    /// A settled claim by the fixture policyholder, filed ten days before submission
    pub fn new() -> Self {
        Self {
            claim: PriorClaim {
                claim_id: ClaimId::new(),
                policyholder_id: IdFixtures::policyholder_id(),
                plate: VehicleFixtures::PLATE_READ.to_string(),
                status: PriorClaimStatus::Settled,
                filed_at: TemporalFixtures::days_before_submission(10),
            },
        }
    }

    pub fn with_policyholder_id(mut self, id: PartyId) -> Self {
        self.claim.policyholder_id = id;
        self
    }

    pub fn with_plate(mut self, plate: &str) -> Self {
        self.claim.plate = plate.to_string();
        self
    }

    pub fn with_status(mut self, status: PriorClaimStatus) -> Self {
        self.claim.status = status;
        self
    }

    pub fn filed_days_before_submission(mut self, days: i64) -> Self {
        self.claim.filed_at = TemporalFixtures::days_before_submission(days);
        self
    }

    pub fn build(self) -> PriorClaim {
        self.claim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builders_are_valid() {
        assert!(FactBundleBuilder::new().try_build().is_ok());
        assert!(ReferenceDataBuilder::new().try_build().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let bundle = FactBundleBuilder::new()
            .with_plate(Some(VehicleFixtures::FOREIGN_PLATE))
            .without_cost_estimate()
            .build();
        assert_eq!(
            bundle.identity().plate_text.as_deref(),
            Some(VehicleFixtures::FOREIGN_PLATE)
        );
        assert!(bundle.cost_estimate().is_none());
    }

    #[test]
    fn test_invalid_override_is_reported() {
        let result = FactBundleBuilder::new().with_plate_confidence(1.5).try_build();
        assert!(result.is_err());
    }
}
