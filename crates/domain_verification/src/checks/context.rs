//! Phase C: does the story hang together
//!
//! Narrative parsing is deliberately keyword based. The narrative is free
//! text written by the claimant, and the only thing extracted from it is the
//! direction of the impact they describe.

use std::collections::BTreeSet;

use crate::checks::{labels_match, non_blank, normalize_label, normalize_plate, plates_partially_match, CheckContext, Issues};
use crate::facts::ImpactPoint;
use crate::finding::{CheckId, Finding, FindingCategory, Severity};

/// Impact direction as described by the claimant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClaimedImpact {
    Front,
    Rear,
    /// A side impact without saying which side
    Side,
    Left,
    Right,
    Roof,
}

impl ClaimedImpact {
    /// Whether damage concentrated at `point` fits this description
    pub fn is_compatible_with(&self, point: ImpactPoint) -> bool {
        match (self, point) {
            (_, ImpactPoint::Multiple) => true,
            (ClaimedImpact::Front, ImpactPoint::Front) => true,
            (ClaimedImpact::Rear, ImpactPoint::Rear) => true,
            (ClaimedImpact::Side, ImpactPoint::Left | ImpactPoint::Right) => true,
            (ClaimedImpact::Left, ImpactPoint::Left) => true,
            (ClaimedImpact::Right, ImpactPoint::Right) => true,
            (ClaimedImpact::Roof, ImpactPoint::Roof) => true,
            _ => false,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ClaimedImpact::Front => "a front",
            ClaimedImpact::Rear => "a rear",
            ClaimedImpact::Side => "a side",
            ClaimedImpact::Left => "a left-side",
            ClaimedImpact::Right => "a right-side",
            ClaimedImpact::Roof => "a roof",
        }
    }
}

/// Phrases where the claimant's own vehicle did the rear-ending
const SELF_REAR_ENDING: &[&str] = &["i rear-ended", "i rear ended", "i rear-end", "i rear end"];

const IMPACT_PHRASES: &[(ClaimedImpact, &[&str])] = &[
    (
        ClaimedImpact::Rear,
        &[
            "rear-ended",
            "rear ended",
            "hit from behind",
            "hit me from behind",
            "from behind",
            "backed into me",
            "reversed into me",
            "tailgat",
        ],
    ),
    (
        ClaimedImpact::Front,
        &[
            "head-on",
            "head on",
            "car in front",
            "vehicle in front",
            "ran into the back of",
            "crashed into the back of",
            "hit a pole",
            "hit a wall",
            "hit a tree",
            "hit the divider",
            "hit a divider",
        ],
    ),
    (
        ClaimedImpact::Side,
        &["t-boned", "t boned", "side-swiped", "sideswiped", "side swiped", "broadside", "side impact"],
    ),
    (
        ClaimedImpact::Left,
        &["left side", "driver side", "driver's side", "left door", "left fender"],
    ),
    (
        ClaimedImpact::Right,
        &["right side", "passenger side", "passenger's side", "right door", "right fender"],
    ),
    (
        ClaimedImpact::Roof,
        &["rolled over", "rollover", "roll over", "fell on the roof", "tree fell", "branch fell"],
    ),
];

/// True when `phrase` occurs in `text` starting at a word boundary
fn mentions(text: &str, phrase: &str) -> bool {
    text.match_indices(phrase).any(|(start, _)| {
        text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric())
    })
}

/// Impact directions mentioned in a narrative
pub fn claimed_impacts(narrative: &str) -> BTreeSet<ClaimedImpact> {
    let mut text = narrative.to_lowercase();
    let mut impacts = BTreeSet::new();

    for phrase in SELF_REAR_ENDING {
        if mentions(&text, phrase) {
            impacts.insert(ClaimedImpact::Front);
            text = text.replace(phrase, " ");
        }
    }

    for (impact, phrases) in IMPACT_PHRASES {
        if phrases.iter().any(|phrase| mentions(&text, phrase)) {
            impacts.insert(*impact);
        }
    }
    impacts
}

/// Check 11: the described impact against where the damage actually is
pub fn narrative_consistency(ctx: &CheckContext<'_>) -> Option<Finding> {
    let point = ctx.bundle.damage().impact_point?;
    let claimed = claimed_impacts(ctx.bundle.narrative());
    if claimed.is_empty() || claimed.iter().any(|impact| impact.is_compatible_with(point)) {
        return None;
    }

    let described = claimed
        .iter()
        .map(ClaimedImpact::label)
        .collect::<Vec<_>>()
        .join(" and ");
    let mut reason = format!(
        "Narrative describes {described} impact but the damage is concentrated on the {point}"
    );
    let scene = ctx.bundle.scene().describe();
    if !scene.is_empty() {
        reason.push_str(&format!(" (scene: {scene})"));
    }

    Some(
        Finding::new(
            CheckId::NarrativeConsistency,
            "NARRATIVE_IMPACT_MISMATCH",
            FindingCategory::NarrativeConflict,
            Severity::High,
            reason,
        )
        .with_action("Interview the claimant about how the incident happened"),
    )
}

/// Distinct values once near-duplicates are merged
fn distinct_labels<'a>(labels: impl Iterator<Item = &'a str>, same: impl Fn(&str, &str) -> bool) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::new();
    for label in labels {
        if !distinct.iter().any(|seen| same(seen.as_str(), label)) {
            distinct.push(label.to_string());
        }
    }
    distinct
}

/// Check 12: every submitted image should show the same vehicle and scene
pub fn multi_image_consistency(ctx: &CheckContext<'_>) -> Option<Finding> {
    let images = ctx.bundle.images();
    if images.len() < 2 {
        return None;
    }
    let min_len = ctx.config.min_partial_plate_length;
    let mut conflicts = Vec::new();

    let plates: Vec<String> = images
        .iter()
        .filter_map(|image| non_blank(&image.plate_text).map(normalize_plate))
        .collect();
    let plates = distinct_labels(plates.iter().map(String::as_str), |a, b| {
        a == b || plates_partially_match(a, b, min_len)
    });
    if plates.len() > 1 {
        conflicts.push(format!("plates {}", plates.join(" vs ")));
    }

    let colors = distinct_labels(
        images.iter().filter_map(|image| non_blank(&image.vehicle_color)),
        labels_match,
    );
    if colors.len() > 1 {
        conflicts.push(format!("colors {}", colors.join(" vs ").to_lowercase()));
    }

    let makes = distinct_labels(
        images.iter().filter_map(|image| non_blank(&image.vehicle_make)),
        labels_match,
    );
    if makes.len() > 1 {
        let makes: Vec<String> = makes.iter().map(|m| normalize_label(m)).collect();
        conflicts.push(format!("makes {}", makes.join(" vs ")));
    }

    let lighting: BTreeSet<&str> = images
        .iter()
        .filter_map(|image| image.lighting)
        .map(|l| l.as_str())
        .collect();
    if lighting.len() > 1 {
        conflicts.push(format!(
            "lighting {}",
            lighting.into_iter().collect::<Vec<_>>().join(" vs ")
        ));
    }

    let impacts: BTreeSet<ImpactPoint> = images
        .iter()
        .filter_map(|image| image.impact_point)
        .filter(|point| *point != ImpactPoint::Multiple)
        .collect();
    if impacts.len() > 1 {
        conflicts.push(format!(
            "impact locations {}",
            impacts.iter().map(ToString::to_string).collect::<Vec<_>>().join(" vs ")
        ));
    }

    let mut issues = Issues::new(CheckId::MultiImageConsistency);
    if !conflicts.is_empty() {
        issues.push_with_action(
            Severity::High,
            "MULTI_IMAGE_INCONSISTENCY",
            FindingCategory::SuspiciousPattern,
            format!(
                "Submitted images disagree on {} across {} images",
                conflicts.join(", "),
                images.len()
            ),
            "Verify that all photos show the same vehicle and incident",
        );
    }
    issues.into_finding()
}

pub fn multi_image_note(ctx: &CheckContext<'_>) -> Option<String> {
    (ctx.bundle.images().len() < 2).then(|| "Fewer than two images submitted".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{ImageObservation, Lighting};
    use crate::testing::run_check;
    use core_kernel::ImageId;

    fn image(plate: &str, color: &str, lighting: Lighting, point: ImpactPoint) -> ImageObservation {
        ImageObservation {
            image_id: ImageId::new(),
            plate_text: Some(plate.to_string()),
            vehicle_color: Some(color.to_string()),
            vehicle_make: Some("Maruti Suzuki".to_string()),
            lighting: Some(lighting),
            impact_point: Some(point),
        }
    }

    mod narrative_tests {
        use super::*;

        #[test]
        fn test_keyword_extraction() {
            assert!(claimed_impacts("I was rear-ended at a signal").contains(&ClaimedImpact::Rear));
            assert!(claimed_impacts("A truck T-boned me").contains(&ClaimedImpact::Side));
            assert!(claimed_impacts("The car rolled over twice").contains(&ClaimedImpact::Roof));
            assert!(claimed_impacts("Parked overnight, found it this way").is_empty());
        }

        #[test]
        fn test_phrases_match_at_word_start() {
            let impacts = claimed_impacts("A taxi rear-ended me");
            assert!(impacts.contains(&ClaimedImpact::Rear));
            assert!(!impacts.contains(&ClaimedImpact::Front));
        }

        #[test]
        fn test_self_rear_ending_is_front_damage() {
            let impacts = claimed_impacts("I rear-ended the bus when it stopped");
            assert!(impacts.contains(&ClaimedImpact::Front));
            assert!(!impacts.contains(&ClaimedImpact::Rear));
        }

        #[test]
        fn test_contradiction_is_high() {
            let finding = run_check(narrative_consistency, |b, _| {
                b.narrative = "Someone rear-ended me while I was waiting at the light".to_string();
            })
            .unwrap();
            assert_eq!(finding.severity(), Severity::High);
            assert_eq!(finding.rule_id(), "NARRATIVE_IMPACT_MISMATCH");
            assert!(finding.reason().contains("a rear impact"));
            assert!(finding.reason().contains("front"));
        }

        #[test]
        fn test_side_claim_matches_either_side() {
            let finding = run_check(narrative_consistency, |b, _| {
                b.narrative = "I got sideswiped on the highway".to_string();
                b.damage.impact_point = Some(ImpactPoint::Right);
            });
            assert!(finding.is_none());
        }

        #[test]
        fn test_multiple_impact_point_accepts_anything() {
            let finding = run_check(narrative_consistency, |b, _| {
                b.narrative = "The car rolled over".to_string();
                b.damage.impact_point = Some(ImpactPoint::Multiple);
            });
            assert!(finding.is_none());
        }

        #[test]
        fn test_unknown_impact_point_passes() {
            let finding = run_check(narrative_consistency, |b, _| {
                b.narrative = "I was rear-ended".to_string();
                b.damage.impact_point = None;
            });
            assert!(finding.is_none());
        }
    }

    mod multi_image_tests {
        use super::*;

        #[test]
        fn test_single_image_passes() {
            let finding = run_check(multi_image_consistency, |b, _| {
                b.images = vec![image("MH12AB3456", "white", Lighting::Daylight, ImpactPoint::Front)];
            });
            assert!(finding.is_none());
        }

        #[test]
        fn test_consistent_images_pass() {
            let finding = run_check(multi_image_consistency, |b, _| {
                b.images = vec![
                    image("MH12AB3456", "White", Lighting::Daylight, ImpactPoint::Front),
                    image("12AB3456", "pearl white", Lighting::Daylight, ImpactPoint::Multiple),
                ];
            });
            assert!(finding.is_none());
        }

        #[test]
        fn test_conflicts_are_listed() {
            let finding = run_check(multi_image_consistency, |b, _| {
                b.images = vec![
                    image("MH12AB3456", "white", Lighting::Daylight, ImpactPoint::Front),
                    image("KA01XY9876", "red", Lighting::Night, ImpactPoint::Front),
                ];
            })
            .unwrap();
            assert_eq!(finding.severity(), Severity::High);
            let reason = finding.reason();
            assert!(reason.contains("plates MH12AB3456 vs KA01XY9876"));
            assert!(reason.contains("colors white vs red"));
            assert!(reason.contains("lighting"));
            assert!(!reason.contains("impact locations"));
        }
    }
}
