//! Phase A: integrity and source of the submitted images

use crate::checks::{CheckContext, Issues};
use crate::facts::{ImageQuality, StockPhotoLikelihood};
use crate::finding::{CheckId, Finding, FindingCategory, Severity};

/// Photos taken slightly before the reported incident time are tolerated
const INCIDENT_TIME_TOLERANCE_MINUTES: i64 = 60;

/// Check 1: image quality gate
pub fn image_quality(ctx: &CheckContext<'_>) -> Option<Finding> {
    let forensics = ctx.bundle.forensics();
    let mut issues = Issues::new(CheckId::ImageQuality);

    if forensics.screen_recapture {
        issues.push(
            Severity::Critical,
            "SCREEN_RECAPTURE",
            FindingCategory::Forgery,
            "Image appears to be a photo of a screen rather than of the vehicle",
        );
    }
    if forensics.blurry {
        issues.push_with_action(
            Severity::High,
            "IMAGE_BLURRY",
            FindingCategory::MetadataIssue,
            "Image is too blurry to verify the damage",
            "Request clearer photos of the damaged area",
        );
    }
    if forensics.image_quality == ImageQuality::Low {
        issues.push_with_action(
            Severity::Medium,
            "IMAGE_LOW_QUALITY",
            FindingCategory::MetadataIssue,
            "Image quality is rated low",
            "Request clearer photos of the damaged area",
        );
    }

    issues.into_finding()
}

/// Check 2: capture metadata against the reported incident
pub fn metadata(ctx: &CheckContext<'_>) -> Option<Finding> {
    let claim = ctx.bundle.claim();
    let metadata = ctx.bundle.metadata();
    let config = ctx.config;
    let mut issues = Issues::new(CheckId::Metadata);

    if metadata.exif_timestamp.is_none() {
        issues.push_with_action(
            Severity::High,
            "METADATA_MISSING",
            FindingCategory::MetadataIssue,
            "No EXIF capture timestamp; the image may be a screenshot or edited copy",
            "Request original photos straight from the camera",
        );
    }

    match &metadata.gps {
        None => issues.push(
            Severity::Low,
            "GPS_MISSING",
            FindingCategory::MetadataIssue,
            "No GPS coordinates in image metadata",
        ),
        Some(gps) => {
            let distance = metadata.distance_from_claimed_location_km.or_else(|| {
                claim
                    .incident_location
                    .as_ref()
                    .map(|location| gps.distance_km(location))
            });
            if let Some(distance) = distance {
                if distance > config.max_gps_distance_km {
                    issues.push(
                        Severity::Medium,
                        "GPS_LOCATION_MISMATCH",
                        FindingCategory::MetadataIssue,
                        format!(
                            "Photo taken {distance:.1} km from the claimed incident location (limit {} km)",
                            config.max_gps_distance_km
                        ),
                    );
                }
            }
        }
    }

    if let Some(delay) = metadata.capture_delay(claim.incident_at) {
        if delay.num_minutes() < -INCIDENT_TIME_TOLERANCE_MINUTES {
            issues.push(
                Severity::Medium,
                "CAPTURE_BEFORE_INCIDENT",
                FindingCategory::MetadataIssue,
                format!(
                    "Photo captured {} hours before the reported incident",
                    -delay.num_hours()
                ),
            );
        } else if delay.num_hours() > i64::from(config.max_capture_delay_hours) {
            issues.push(
                Severity::Medium,
                "CAPTURE_DELAYED",
                FindingCategory::MetadataIssue,
                format!(
                    "Photo captured {} hours after the incident (limit {} hours)",
                    delay.num_hours(),
                    config.max_capture_delay_hours
                ),
            );
        }
    }

    issues.into_finding()
}

/// Check 3: stock-photo likelihood from the reverse-image heuristic
pub fn reverse_image(ctx: &CheckContext<'_>) -> Option<Finding> {
    let likelihood = ctx.bundle.forensics().stock_photo_likelihood;
    let mut issues = Issues::new(CheckId::ReverseImage);

    match likelihood {
        StockPhotoLikelihood::High | StockPhotoLikelihood::VeryHigh => issues.push(
            Severity::Critical,
            "STOCK_PHOTO_DETECTED",
            FindingCategory::Forgery,
            "Image is very likely a stock or internet photo",
        ),
        StockPhotoLikelihood::Medium => issues.push(
            Severity::Medium,
            "STOCK_PHOTO_SUSPECTED",
            FindingCategory::Forgery,
            "Image resembles a stock or internet photo",
        ),
        StockPhotoLikelihood::Unknown | StockPhotoLikelihood::Low => {}
    }

    issues.into_finding()
}

/// Check 4: signs of digital manipulation
pub fn digital_forgery(ctx: &CheckContext<'_>) -> Option<Finding> {
    let forensics = ctx.bundle.forensics();
    let indicators: Vec<&str> = [
        (forensics.ui_elements, "on-screen UI elements"),
        (forensics.watermark, "watermark"),
        (forensics.lighting_inconsistent, "inconsistent lighting"),
        (forensics.shadows_inconsistent, "inconsistent shadows"),
        (forensics.editing_detected, "editing artefacts"),
        (forensics.compression_inconsistent, "inconsistent compression"),
    ]
    .into_iter()
    .filter_map(|(present, label)| present.then_some(label))
    .collect();

    if indicators.is_empty() {
        return None;
    }

    Some(Finding::new(
        CheckId::DigitalForgery,
        "DIGITAL_MANIPULATION",
        FindingCategory::Forgery,
        Severity::Critical,
        format!("Image manipulation indicators: {}", indicators.join(", ")),
    ))
}
