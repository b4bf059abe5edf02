//! Construction-time validation for fact bundles and reference data
//!
//! Validation fails fast on the first problem found. Anything that passes
//! here is safe for every check to consume without further guards.

use core_kernel::{DateRange, Money};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;

use crate::error::ValidationError;
use crate::facts::{FactBundleParts, GeoPoint};
use crate::reference::ReferenceDataParts;

const CONFIDENCE_RANGE: &str = "0.0..=1.0";

/// Largest amount accepted anywhere in the inputs. Keeps every product the
/// checks compute (amount times a capped ratio) far inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

fn ensure_confidence(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::out_of_range(field, value, CONFIDENCE_RANGE))
    }
}

fn ensure_coordinates(field: &'static str, point: &GeoPoint) -> Result<(), ValidationError> {
    if !(point.latitude.is_finite() && (-90.0..=90.0).contains(&point.latitude)) {
        return Err(ValidationError::out_of_range(field, point.latitude, "latitude -90..=90"));
    }
    if !(point.longitude.is_finite() && (-180.0..=180.0).contains(&point.longitude)) {
        return Err(ValidationError::out_of_range(field, point.longitude, "longitude -180..=180"));
    }
    Ok(())
}

fn ensure_amount(field: &'static str, amount: &Money) -> Result<(), ValidationError> {
    if amount.is_negative() {
        return Err(ValidationError::NegativeAmount {
            field,
            value: amount.to_string(),
        });
    }
    if amount.amount() > MAX_AMOUNT {
        return Err(ValidationError::out_of_range(field, amount, "at most 10^15"));
    }
    Ok(())
}

fn ensure_same_currency(field: &'static str, a: &Money, b: &Money) -> Result<(), ValidationError> {
    a.ensure_same_currency(b)
        .map_err(|source| ValidationError::Currency { field, source })
}

/// Validates a fact bundle before it is frozen
pub fn validate_bundle(parts: &FactBundleParts) -> Result<(), ValidationError> {
    let claim = &parts.claim;
    if claim.incident_at > claim.submitted_at {
        return Err(ValidationError::out_of_range(
            "claim.incident_at",
            claim.incident_at,
            "not after claim.submitted_at",
        ));
    }
    if let Some(location) = &claim.incident_location {
        ensure_coordinates("claim.incident_location", location)?;
    }

    let identity = &parts.identity;
    ensure_confidence("identity.detection_confidence", identity.detection_confidence)?;
    ensure_confidence("identity.plate_confidence", identity.plate_confidence)?;
    if let Some(vin) = &identity.vin {
        ensure_confidence("identity.vin.confidence", vin.confidence)?;
    }

    let score = parts.damage.severity_score;
    if !(score.is_finite() && (0.0..=10.0).contains(&score)) {
        return Err(ValidationError::out_of_range("damage.severity_score", score, "0.0..=10.0"));
    }

    if let Some(gps) = &parts.metadata.gps {
        ensure_coordinates("metadata.gps", gps)?;
    }
    if let Some(distance) = parts.metadata.distance_from_claimed_location_km {
        if !(distance.is_finite() && distance >= 0.0) {
            return Err(ValidationError::out_of_range(
                "metadata.distance_from_claimed_location_km",
                distance,
                "a non-negative distance",
            ));
        }
    }

    let mut seen = HashSet::new();
    for image in &parts.images {
        if !seen.insert(image.image_id) {
            return Err(ValidationError::DuplicateImage(image.image_id.to_string()));
        }
    }

    ensure_amount("claimed_amount", &parts.claimed_amount)?;

    if let Some(estimate) = &parts.cost_estimate {
        ensure_amount("cost_estimate.min", &estimate.min)?;
        ensure_amount("cost_estimate.max", &estimate.max)?;
        ensure_same_currency("cost_estimate", &estimate.min, &estimate.max)?;
        ensure_same_currency("cost_estimate", &parts.claimed_amount, &estimate.min)?;
        if estimate.min.exceeds(&estimate.max) {
            return Err(ValidationError::InvertedEstimate {
                min: estimate.min.to_string(),
                max: estimate.max.to_string(),
            });
        }
    }

    Ok(())
}

/// Validates a policy record and its claim history
pub fn validate_reference(parts: &ReferenceDataParts) -> Result<(), ValidationError> {
    let policy = &parts.policy;
    let vehicle = &policy.vehicle;

    if vehicle.make.trim().is_empty() {
        return Err(ValidationError::MissingField("policy.vehicle.make"));
    }
    if vehicle.model.trim().is_empty() {
        return Err(ValidationError::MissingField("policy.vehicle.model"));
    }
    if vehicle.plate.trim().is_empty() {
        return Err(ValidationError::MissingField("policy.vehicle.plate"));
    }

    ensure_amount("policy.coverage_ceiling", &policy.coverage_ceiling)?;

    // DateRange fields are public, so a deserialized window has not been checked yet
    DateRange::new(policy.validity.start, policy.validity.end)?;

    Ok(())
}
