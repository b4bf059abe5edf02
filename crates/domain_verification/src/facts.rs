//! The fact bundle: everything extracted about one claim submission
//!
//! Upstream collaborators (object detection, OCR, vision models, EXIF
//! readers) fill in a [`FactBundleParts`]; [`FactBundle::new`] validates it
//! and freezes it. Checks only ever see the frozen bundle.
//!
//! Sub-structures keep public fields because they are plain observations.
//! The bundle itself hides its fields so that an unvalidated bundle can
//! never reach the engine.

use chrono::{DateTime, Duration, Utc};
use core_kernel::{ClaimId, ImageId, Money, PartyId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::validation;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Great-circle distance in kilometres (haversine)
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

/// Claim-level context supplied with the submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimContext {
    pub claim_id: ClaimId,
    pub policyholder_id: PartyId,
    /// Reference instant for every time window the engine evaluates
    pub submitted_at: DateTime<Utc>,
    pub incident_at: DateTime<Utc>,
    #[serde(default)]
    pub incident_location: Option<GeoPoint>,
}

/// An OCR read of some printed identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrReading {
    #[serde(default)]
    pub text: Option<String>,
    pub confidence: f64,
}

/// What the vision pipeline believes the vehicle is
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityFacts {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<u16>,
    pub color: Option<String>,
    pub detection_confidence: f64,
    pub plate_text: Option<String>,
    pub plate_confidence: f64,
    pub plate_visible: bool,
    pub plate_obscured: bool,
    pub vin: Option<OcrReading>,
}

/// Damage severity bands, ordered from none to totaled
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageSeverity {
    #[default]
    None,
    Minor,
    Moderate,
    Severe,
    Totaled,
}

impl DamageSeverity {
    /// Position on the none..totaled scale
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Number of bands between two severities
    pub fn bands_between(&self, other: &DamageSeverity) -> u8 {
        self.rank().abs_diff(other.rank())
    }
}

impl fmt::Display for DamageSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DamageSeverity::None => "none",
            DamageSeverity::Minor => "minor",
            DamageSeverity::Moderate => "moderate",
            DamageSeverity::Severe => "severe",
            DamageSeverity::Totaled => "totaled",
        };
        f.write_str(label)
    }
}

/// Where on the vehicle the damage is concentrated
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactPoint {
    Front,
    Rear,
    Left,
    Right,
    Roof,
    Undercarriage,
    Multiple,
}

impl fmt::Display for ImpactPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ImpactPoint::Front => "front",
            ImpactPoint::Rear => "rear",
            ImpactPoint::Left => "left side",
            ImpactPoint::Right => "right side",
            ImpactPoint::Roof => "roof",
            ImpactPoint::Undercarriage => "undercarriage",
            ImpactPoint::Multiple => "multiple areas",
        };
        f.write_str(label)
    }
}

/// Signs that damage predates the reported incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreExistingIndicators {
    pub rust: bool,
    pub dirt_in_damage: bool,
    pub faded_paint: bool,
    pub old_repairs: bool,
}

impl PreExistingIndicators {
    /// Labels of the indicators that are present, in a fixed order
    pub fn present(&self) -> Vec<&'static str> {
        [
            (self.rust, "rust"),
            (self.dirt_in_damage, "dirt in damaged area"),
            (self.faded_paint, "faded paint"),
            (self.old_repairs, "old repairs"),
        ]
        .into_iter()
        .filter_map(|(present, label)| present.then_some(label))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageFacts {
    pub detected: bool,
    pub damage_type: Option<String>,
    pub severity: DamageSeverity,
    /// Continuous severity on a 0-10 scale
    pub severity_score: f64,
    pub damaged_panels: Vec<String>,
    pub impact_point: Option<ImpactPoint>,
    pub structural: bool,
    pub airbags_deployed: bool,
    pub fluid_leak: bool,
    pub missing_parts: bool,
    pub pre_existing: PreExistingIndicators,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageQuality {
    #[default]
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPhotoLikelihood {
    #[default]
    Unknown,
    Low,
    Medium,
    High,
    VeryHigh,
}

/// Image forensics flags
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForensicFacts {
    pub screen_recapture: bool,
    pub ui_elements: bool,
    pub watermark: bool,
    pub blurry: bool,
    pub image_quality: ImageQuality,
    pub lighting_inconsistent: bool,
    pub shadows_inconsistent: bool,
    pub editing_detected: bool,
    pub compression_inconsistent: bool,
    pub stock_photo_likelihood: StockPhotoLikelihood,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Road,
    Highway,
    Intersection,
    ParkingLot,
    Residential,
    Other,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Road => "road",
            LocationType::Highway => "highway",
            LocationType::Intersection => "intersection",
            LocationType::ParkingLot => "parking lot",
            LocationType::Residential => "residential street",
            LocationType::Other => "other location",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Day,
    Dusk,
    Night,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Day => "daytime",
            TimeOfDay::Dusk => "dusk",
            TimeOfDay::Night => "night",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Clear,
    Rain,
    Fog,
    Snow,
}

impl Weather {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Clear => "clear",
            Weather::Rain => "rain",
            Weather::Fog => "fog",
            Weather::Snow => "snow",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFacts {
    pub location_type: Option<LocationType>,
    pub time_of_day: Option<TimeOfDay>,
    pub weather: Option<Weather>,
    pub debris_present: bool,
    pub other_vehicles_present: bool,
}

impl SceneFacts {
    /// Short description of the scene, empty when nothing was observed
    pub fn describe(&self) -> String {
        [
            self.location_type.map(|l| l.as_str()),
            self.time_of_day.map(|t| t.as_str()),
            self.weather.map(|w| w.as_str()),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Capture metadata read from the submitted photos
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureMetadata {
    pub exif_timestamp: Option<DateTime<Utc>>,
    pub gps: Option<GeoPoint>,
    /// Distance already computed upstream, preferred over our own haversine
    pub distance_from_claimed_location_km: Option<f64>,
}

impl CaptureMetadata {
    /// Time between the incident and the photo capture
    ///
    /// Negative when the photo predates the incident.
    pub fn capture_delay(&self, incident_at: DateTime<Utc>) -> Option<Duration> {
        self.exif_timestamp.map(|captured| captured - incident_at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lighting {
    Daylight,
    Overcast,
    Dusk,
    Night,
    Artificial,
}

impl Lighting {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lighting::Daylight => "daylight",
            Lighting::Overcast => "overcast",
            Lighting::Dusk => "dusk",
            Lighting::Night => "night",
            Lighting::Artificial => "artificial",
        }
    }
}

/// Observations from one image when several were submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageObservation {
    pub image_id: ImageId,
    #[serde(default)]
    pub plate_text: Option<String>,
    #[serde(default)]
    pub vehicle_color: Option<String>,
    #[serde(default)]
    pub vehicle_make: Option<String>,
    #[serde(default)]
    pub lighting: Option<Lighting>,
    #[serde(default)]
    pub impact_point: Option<ImpactPoint>,
}

/// Summary from the secondary damage detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorSummary {
    pub damage_detected: bool,
    pub severity: DamageSeverity,
}

/// Repair cost range from the external cost collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub min: Money,
    pub max: Money,
}

impl CostEstimate {
    pub fn midpoint(&self) -> Money {
        // min and max share a currency once the bundle is validated
        self.min.midpoint(&self.max).unwrap_or(self.max)
    }
}

/// Unvalidated fact bundle, as assembled by the extraction pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactBundleParts {
    pub claim: ClaimContext,
    #[serde(default)]
    pub identity: IdentityFacts,
    #[serde(default)]
    pub damage: DamageFacts,
    #[serde(default)]
    pub forensics: ForensicFacts,
    #[serde(default)]
    pub scene: SceneFacts,
    #[serde(default)]
    pub metadata: CaptureMetadata,
    #[serde(default)]
    pub narrative: String,
    #[serde(default)]
    pub images: Vec<ImageObservation>,
    #[serde(default)]
    pub object_detection: Option<DetectorSummary>,
    pub claimed_amount: Money,
    #[serde(default)]
    pub cost_estimate: Option<CostEstimate>,
}

/// Validated, immutable snapshot of one claim submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FactBundleParts", into = "FactBundleParts")]
pub struct FactBundle {
    claim: ClaimContext,
    identity: IdentityFacts,
    damage: DamageFacts,
    forensics: ForensicFacts,
    scene: SceneFacts,
    metadata: CaptureMetadata,
    narrative: String,
    images: Vec<ImageObservation>,
    object_detection: Option<DetectorSummary>,
    claimed_amount: Money,
    cost_estimate: Option<CostEstimate>,
}

impl FactBundle {
    /// Validates the parts and freezes them into a bundle
    pub fn new(parts: FactBundleParts) -> Result<Self, ValidationError> {
        validation::validate_bundle(&parts)?;
        Ok(Self {
            claim: parts.claim,
            identity: parts.identity,
            damage: parts.damage,
            forensics: parts.forensics,
            scene: parts.scene,
            metadata: parts.metadata,
            narrative: parts.narrative,
            images: parts.images,
            object_detection: parts.object_detection,
            claimed_amount: parts.claimed_amount,
            cost_estimate: parts.cost_estimate,
        })
    }

    pub fn claim(&self) -> &ClaimContext {
        &self.claim
    }

    pub fn identity(&self) -> &IdentityFacts {
        &self.identity
    }

    pub fn damage(&self) -> &DamageFacts {
        &self.damage
    }

    pub fn forensics(&self) -> &ForensicFacts {
        &self.forensics
    }

    pub fn scene(&self) -> &SceneFacts {
        &self.scene
    }

    pub fn metadata(&self) -> &CaptureMetadata {
        &self.metadata
    }

    pub fn narrative(&self) -> &str {
        &self.narrative
    }

    pub fn images(&self) -> &[ImageObservation] {
        &self.images
    }

    pub fn object_detection(&self) -> Option<&DetectorSummary> {
        self.object_detection.as_ref()
    }

    pub fn claimed_amount(&self) -> Money {
        self.claimed_amount
    }

    pub fn cost_estimate(&self) -> Option<&CostEstimate> {
        self.cost_estimate.as_ref()
    }

    /// Returns the parts so a caller can derive a modified bundle
    pub fn into_parts(self) -> FactBundleParts {
        FactBundleParts {
            claim: self.claim,
            identity: self.identity,
            damage: self.damage,
            forensics: self.forensics,
            scene: self.scene,
            metadata: self.metadata,
            narrative: self.narrative,
            images: self.images,
            object_detection: self.object_detection,
            claimed_amount: self.claimed_amount,
            cost_estimate: self.cost_estimate,
        }
    }
}

impl TryFrom<FactBundleParts> for FactBundle {
    type Error = ValidationError;

    fn try_from(parts: FactBundleParts) -> Result<Self, Self::Error> {
        Self::new(parts)
    }
}

impl From<FactBundle> for FactBundleParts {
    fn from(bundle: FactBundle) -> Self {
        bundle.into_parts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_haversine_known_distance() {
        // Mumbai to Pune is roughly 120 km as the crow flies
        let mumbai = GeoPoint::new(19.0760, 72.8777);
        let pune = GeoPoint::new(18.5204, 73.8567);
        let distance = mumbai.distance_km(&pune);
        assert!((115.0..125.0).contains(&distance), "got {distance}");
        assert!(mumbai.distance_km(&mumbai).abs() < 1e-9);
    }

    #[test]
    fn test_severity_bands() {
        assert_eq!(DamageSeverity::Minor.bands_between(&DamageSeverity::Severe), 2);
        assert_eq!(DamageSeverity::Totaled.bands_between(&DamageSeverity::None), 4);
        assert_eq!(DamageSeverity::Moderate.bands_between(&DamageSeverity::Moderate), 0);
    }

    #[test]
    fn test_pre_existing_present_labels() {
        let indicators = PreExistingIndicators {
            rust: true,
            old_repairs: true,
            ..Default::default()
        };
        assert_eq!(indicators.present(), vec!["rust", "old repairs"]);
        assert!(PreExistingIndicators::default().present().is_empty());
    }

    #[test]
    fn test_capture_delay_sign() {
        let incident = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let metadata = CaptureMetadata {
            exif_timestamp: Some(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()),
            ..Default::default()
        };
        assert_eq!(metadata.capture_delay(incident), Some(Duration::hours(-2)));
        assert_eq!(CaptureMetadata::default().capture_delay(incident), None);
    }

    #[test]
    fn test_scene_description() {
        let scene = SceneFacts {
            location_type: Some(LocationType::ParkingLot),
            time_of_day: Some(TimeOfDay::Night),
            ..Default::default()
        };
        assert_eq!(scene.describe(), "parking lot, night");
        assert_eq!(SceneFacts::default().describe(), "");
    }
}
