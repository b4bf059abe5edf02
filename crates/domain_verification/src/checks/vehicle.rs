//! Phase B: the vehicle in the photos and the damage on it

use crate::checks::{labels_match, non_blank, normalize_plate, plates_partially_match, CheckContext, Issues};
use crate::facts::DamageSeverity;
use crate::finding::{CheckId, Finding, FindingCategory, Severity};

/// Check 5: detected make, model and color against the policy vehicle
pub fn vehicle_match(ctx: &CheckContext<'_>) -> Option<Finding> {
    let identity = ctx.bundle.identity();
    let on_file = &ctx.reference.policy().vehicle;
    let mut issues = Issues::new(CheckId::VehicleMatch);

    match (non_blank(&identity.make), non_blank(&identity.model)) {
        (Some(make), Some(model)) => {
            if !labels_match(make, &on_file.make) || !labels_match(model, &on_file.model) {
                issues.push(
                    Severity::Critical,
                    "VEHICLE_MISMATCH",
                    FindingCategory::Mismatch,
                    format!(
                        "Vehicle mismatch: policy covers {} {}, photos show {} {}",
                        on_file.make, on_file.model, make, model
                    ),
                );
            }
        }
        _ => issues.push_with_action(
            Severity::Medium,
            "VEHICLE_UNIDENTIFIED",
            FindingCategory::Mismatch,
            "Vehicle make or model could not be identified from the photos",
            "Request a photo showing the full vehicle",
        ),
    }

    if identity.detection_confidence < ctx.config.min_vehicle_detection_confidence {
        issues.push(
            Severity::Medium,
            "VEHICLE_LOW_CONFIDENCE",
            FindingCategory::Mismatch,
            format!(
                "Vehicle detection confidence {:.0}% is below the {:.0}% floor",
                identity.detection_confidence * 100.0,
                ctx.config.min_vehicle_detection_confidence * 100.0
            ),
        );
    }

    if let (Some(detected), Some(expected)) = (non_blank(&identity.color), non_blank(&on_file.color)) {
        if !labels_match(detected, expected) {
            issues.push(
                Severity::Medium,
                "VEHICLE_COLOR_MISMATCH",
                FindingCategory::Mismatch,
                format!("Vehicle color is {detected}, policy records {expected}"),
            );
        }
    }

    issues.into_finding()
}

/// Check 6: OCR plate against the registered plate
pub fn license_plate(ctx: &CheckContext<'_>) -> Option<Finding> {
    let identity = ctx.bundle.identity();
    let expected = normalize_plate(&ctx.reference.policy().vehicle.plate);
    let read = identity.plate_text.as_deref().map(normalize_plate).unwrap_or_default();
    let mut issues = Issues::new(CheckId::LicensePlate);

    if read.is_empty() {
        let severity = if identity.plate_obscured {
            Severity::Medium
        } else {
            Severity::High
        };
        let detail = if identity.plate_obscured {
            "License plate is obscured in the photos"
        } else {
            "License plate could not be read from the photos"
        };
        issues.push_with_action(
            severity,
            "PLATE_NOT_DETECTED",
            FindingCategory::Mismatch,
            detail,
            "Request a clear photo of the registration plate",
        );
        return issues.into_finding();
    }

    if read != expected
        && !plates_partially_match(&read, &expected, ctx.config.min_partial_plate_length)
    {
        issues.push(
            Severity::Critical,
            "PLATE_MISMATCH",
            FindingCategory::Mismatch,
            format!("Plate mismatch: policy registers {expected}, photos show {read}"),
        );
    }

    if identity.plate_confidence < ctx.config.min_plate_ocr_confidence {
        issues.push(
            Severity::Medium,
            "PLATE_LOW_CONFIDENCE",
            FindingCategory::Mismatch,
            format!(
                "Plate OCR confidence {:.0}% is below the {:.0}% floor",
                identity.plate_confidence * 100.0,
                ctx.config.min_plate_ocr_confidence * 100.0
            ),
        );
    }

    issues.into_finding()
}

pub fn license_plate_note(ctx: &CheckContext<'_>) -> Option<String> {
    let expected = normalize_plate(&ctx.reference.policy().vehicle.plate);
    let read = ctx.bundle.identity().plate_text.as_deref().map(normalize_plate)?;
    (!read.is_empty() && read != expected)
        .then(|| format!("Partial plate read {read} accepted against {expected}"))
}

/// Check 7: chassis number, when one was photographed
pub fn vin_match(ctx: &CheckContext<'_>) -> Option<Finding> {
    let reading = ctx.bundle.identity().vin.as_ref()?;
    let mut issues = Issues::new(CheckId::VinMatch);
    let read = reading.text.as_deref().map(normalize_plate).unwrap_or_default();

    if read.is_empty() {
        issues.push_with_action(
            Severity::Medium,
            "VIN_UNREADABLE",
            FindingCategory::Mismatch,
            "Chassis number is present but could not be read",
            "Request a clear photo of the chassis number plate",
        );
        return issues.into_finding();
    }

    if reading.confidence < ctx.config.min_vin_ocr_confidence {
        issues.push_with_action(
            Severity::Medium,
            "VIN_UNREADABLE",
            FindingCategory::Mismatch,
            format!(
                "Chassis number OCR confidence {:.0}% is below the {:.0}% floor",
                reading.confidence * 100.0,
                ctx.config.min_vin_ocr_confidence * 100.0
            ),
            "Request a clear photo of the chassis number plate",
        );
    }

    if let Some(expected) = non_blank(&ctx.reference.policy().vehicle.vin) {
        let expected = normalize_plate(expected);
        if read != expected {
            issues.push(
                Severity::High,
                "VIN_MISMATCH",
                FindingCategory::Mismatch,
                format!("Chassis number mismatch: policy records {expected}, photos show {read}"),
            );
        }
    }

    issues.into_finding()
}

pub fn vin_match_note(ctx: &CheckContext<'_>) -> Option<String> {
    ctx.bundle
        .identity()
        .vin
        .is_none()
        .then(|| "No chassis number photographed".to_string())
}

/// Informational confidence that damage predates the incident
fn pre_existing_confidence(indicators: usize) -> u8 {
    match indicators {
        0 => 0,
        1 => 40,
        2 => 70,
        _ => 95,
    }
}

/// Check 8: signs that the damage is older than the incident
pub fn pre_existing_damage(ctx: &CheckContext<'_>) -> Option<Finding> {
    let present = ctx.bundle.damage().pre_existing.present();
    if present.is_empty() {
        return None;
    }

    Some(
        Finding::new(
            CheckId::PreExistingDamage,
            "PRE_EXISTING_DAMAGE",
            FindingCategory::PreExisting,
            Severity::High,
            format!("Damage shows signs of predating the incident: {}", present.join(", ")),
        )
        .with_action("Inspect the vehicle to establish the age of the damage")
        .with_indicator_confidence(pre_existing_confidence(present.len())),
    )
}

/// Check 9: primary damage assessment against the secondary detector
pub fn damage_corroboration(ctx: &CheckContext<'_>) -> Option<Finding> {
    let secondary = ctx.bundle.object_detection()?;
    let damage = ctx.bundle.damage();
    let mut issues = Issues::new(CheckId::DamageCorroboration);

    if damage.detected != secondary.damage_detected {
        let (primary_says, secondary_says) = if damage.detected {
            ("damage", "none")
        } else {
            ("none", "damage")
        };
        issues.push(
            Severity::High,
            "DETECTOR_DISAGREEMENT",
            FindingCategory::SuspiciousPattern,
            format!(
                "Damage assessments disagree: primary reports {primary_says}, secondary detector reports {secondary_says}"
            ),
        );
    } else if damage.severity.bands_between(&secondary.severity) >= 2 {
        issues.push(
            Severity::Medium,
            "DETECTOR_SEVERITY_GAP",
            FindingCategory::SuspiciousPattern,
            format!(
                "Severity estimates diverge: primary {}, secondary detector {}",
                damage.severity, secondary.severity
            ),
        );
    }

    issues.into_finding()
}

pub fn damage_corroboration_note(ctx: &CheckContext<'_>) -> Option<String> {
    ctx.bundle
        .object_detection()
        .is_none()
        .then(|| "Secondary detector not available".to_string())
}

/// Check 10: a total loss should show the damage that makes it one
pub fn total_loss_markers(ctx: &CheckContext<'_>) -> Option<Finding> {
    let damage = ctx.bundle.damage();
    if damage.severity != DamageSeverity::Totaled
        || damage.airbags_deployed
        || damage.fluid_leak
        || damage.missing_parts
    {
        return None;
    }

    Some(Finding::new(
        CheckId::TotalLossMarkers,
        "TOTAL_LOSS_UNSUPPORTED",
        FindingCategory::SuspiciousPattern,
        Severity::High,
        "Vehicle assessed as totaled but shows no airbag deployment, fluid leak or missing parts",
    ))
}
