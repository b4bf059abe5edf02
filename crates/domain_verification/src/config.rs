//! Verification thresholds
//!
//! [`Thresholds`] is the plain, deserializable bag of numbers; every field
//! falls back to its default so a partial override file is enough.
//! [`VerificationConfig`] wraps it once the values have been checked for
//! coherence and is what the engine accepts.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

use crate::error::ConfigurationError;

const MAX_ESTIMATE_RATIO: Decimal = dec!(100);
const MAX_COMPOUND_MULTIPLIER: Decimal = dec!(10);

/// Named, overridable verification thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Claims above this amount lose fast-track eligibility
    pub auto_approval_ceiling: Decimal,
    pub min_vehicle_detection_confidence: f64,
    pub min_plate_ocr_confidence: f64,
    pub min_vin_ocr_confidence: f64,
    /// Shortest plate fragment accepted as a truncated read
    pub min_partial_plate_length: usize,
    pub max_gps_distance_km: f64,
    pub max_capture_delay_hours: u32,
    pub flag_threshold: Decimal,
    pub reject_threshold: Decimal,
    /// Flagged claims at or above this score get HIGH review priority
    pub high_priority_score: Decimal,
    pub max_claim_to_estimate_ratio: Decimal,
    pub duplicate_lookback_days: u32,
    /// Number of HIGH or CRITICAL findings that triggers compounding
    pub compound_failure_threshold: usize,
    pub compound_multiplier: Decimal,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            auto_approval_ceiling: dec!(20000),
            min_vehicle_detection_confidence: 0.85,
            min_plate_ocr_confidence: 0.80,
            min_vin_ocr_confidence: 0.75,
            min_partial_plate_length: 4,
            max_gps_distance_km: 50.0,
            max_capture_delay_hours: 72,
            flag_threshold: dec!(2),
            reject_threshold: dec!(10),
            high_priority_score: dec!(6),
            max_claim_to_estimate_ratio: dec!(2.0),
            duplicate_lookback_days: 30,
            compound_failure_threshold: 3,
            compound_multiplier: dec!(1.5),
        }
    }
}

impl Thresholds {
    /// Checks that the thresholds describe a coherent decision matrix
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let amounts = [
            ("auto_approval_ceiling", self.auto_approval_ceiling),
            ("flag_threshold", self.flag_threshold),
            ("reject_threshold", self.reject_threshold),
            ("high_priority_score", self.high_priority_score),
        ];
        for (name, value) in amounts {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(ConfigurationError::Negative {
                    name,
                    value: value.to_string(),
                });
            }
        }

        let confidences = [
            ("min_vehicle_detection_confidence", self.min_vehicle_detection_confidence),
            ("min_plate_ocr_confidence", self.min_plate_ocr_confidence),
            ("min_vin_ocr_confidence", self.min_vin_ocr_confidence),
        ];
        for (name, value) in confidences {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigurationError::ConfidenceOutOfRange { name, value });
            }
        }

        if !(self.max_gps_distance_km.is_finite() && self.max_gps_distance_km > 0.0) {
            return Err(ConfigurationError::NotPositive {
                name: "max_gps_distance_km",
                value: self.max_gps_distance_km.to_string(),
            });
        }

        if self.max_claim_to_estimate_ratio <= Decimal::ZERO {
            return Err(ConfigurationError::NotPositive {
                name: "max_claim_to_estimate_ratio",
                value: self.max_claim_to_estimate_ratio.to_string(),
            });
        }

        let capped = [
            ("max_claim_to_estimate_ratio", self.max_claim_to_estimate_ratio, MAX_ESTIMATE_RATIO, "100"),
            ("compound_multiplier", self.compound_multiplier, MAX_COMPOUND_MULTIPLIER, "10"),
        ];
        for (name, value, max, shown) in capped {
            if value > max {
                return Err(ConfigurationError::AboveMaximum {
                    name,
                    value: value.to_string(),
                    max: shown,
                });
            }
        }

        if self.min_partial_plate_length == 0 {
            return Err(ConfigurationError::NotPositive {
                name: "min_partial_plate_length",
                value: "0".to_string(),
            });
        }

        if self.flag_threshold > self.reject_threshold {
            return Err(ConfigurationError::ThresholdOrder {
                flag: self.flag_threshold.to_string(),
                reject: self.reject_threshold.to_string(),
            });
        }

        if self.compound_multiplier < Decimal::ONE {
            return Err(ConfigurationError::MultiplierBelowOne(
                self.compound_multiplier.to_string(),
            ));
        }

        if self.compound_failure_threshold == 0 {
            return Err(ConfigurationError::ZeroCompoundTrigger);
        }

        Ok(())
    }
}

/// Validated thresholds, read-only for the lifetime of an evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Thresholds", into = "Thresholds")]
pub struct VerificationConfig {
    thresholds: Thresholds,
}

impl VerificationConfig {
    pub fn new(thresholds: Thresholds) -> Result<Self, ConfigurationError> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
        }
    }
}

impl Deref for VerificationConfig {
    type Target = Thresholds;

    fn deref(&self) -> &Self::Target {
        &self.thresholds
    }
}

impl TryFrom<Thresholds> for VerificationConfig {
    type Error = ConfigurationError;

    fn try_from(thresholds: Thresholds) -> Result<Self, Self::Error> {
        Self::new(thresholds)
    }
}

impl From<VerificationConfig> for Thresholds {
    fn from(config: VerificationConfig) -> Self {
        config.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = VerificationConfig::default();
        assert!(config.thresholds().validate().is_ok());
        assert_eq!(config.auto_approval_ceiling, dec!(20000));
        assert_eq!(config.compound_multiplier, dec!(1.5));
        assert_eq!(config.duplicate_lookback_days, 30);
    }

    #[test]
    fn test_flag_above_reject_rejected() {
        let thresholds = Thresholds {
            flag_threshold: dec!(12),
            ..Thresholds::default()
        };
        assert!(matches!(
            VerificationConfig::new(thresholds),
            Err(ConfigurationError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn test_unbounded_multipliers_rejected() {
        let thresholds = Thresholds {
            compound_multiplier: Decimal::MAX,
            ..Thresholds::default()
        };
        assert!(matches!(
            VerificationConfig::new(thresholds),
            Err(ConfigurationError::AboveMaximum { name: "compound_multiplier", .. })
        ));

        let thresholds = Thresholds {
            max_claim_to_estimate_ratio: dec!(100.5),
            ..Thresholds::default()
        };
        assert!(matches!(
            VerificationConfig::new(thresholds),
            Err(ConfigurationError::AboveMaximum { name: "max_claim_to_estimate_ratio", .. })
        ));

        let thresholds = Thresholds {
            compound_multiplier: dec!(10),
            max_claim_to_estimate_ratio: dec!(100),
            ..Thresholds::default()
        };
        assert!(VerificationConfig::new(thresholds).is_ok());
    }

    #[test]
    fn test_multiplier_below_one_rejected() {
        let thresholds = Thresholds {
            compound_multiplier: dec!(0.9),
            ..Thresholds::default()
        };
        assert!(matches!(
            VerificationConfig::new(thresholds),
            Err(ConfigurationError::MultiplierBelowOne(_))
        ));
    }

    #[test]
    fn test_zero_trigger_rejected() {
        let thresholds = Thresholds {
            compound_failure_threshold: 0,
            ..Thresholds::default()
        };
        assert_eq!(
            VerificationConfig::new(thresholds),
            Err(ConfigurationError::ZeroCompoundTrigger)
        );
    }

    #[test]
    fn test_confidence_floor_out_of_range() {
        let thresholds = Thresholds {
            min_plate_ocr_confidence: 1.2,
            ..Thresholds::default()
        };
        assert!(matches!(
            VerificationConfig::new(thresholds),
            Err(ConfigurationError::ConfidenceOutOfRange {
                name: "min_plate_ocr_confidence",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_ceiling_rejected() {
        let thresholds = Thresholds {
            auto_approval_ceiling: dec!(-1),
            ..Thresholds::default()
        };
        assert!(matches!(
            VerificationConfig::new(thresholds),
            Err(ConfigurationError::Negative { .. })
        ));
    }

    #[test]
    fn test_non_positive_ratio_rejected() {
        let thresholds = Thresholds {
            max_claim_to_estimate_ratio: dec!(0),
            ..Thresholds::default()
        };
        assert!(matches!(
            VerificationConfig::new(thresholds),
            Err(ConfigurationError::NotPositive { .. })
        ));
    }

    #[test]
    fn test_partial_override_deserializes_with_defaults() {
        let config: VerificationConfig =
            serde_json::from_str(r#"{ "reject_threshold": "15", "duplicate_lookback_days": 60 }"#)
                .unwrap();
        assert_eq!(config.reject_threshold, dec!(15));
        assert_eq!(config.duplicate_lookback_days, 60);
        assert_eq!(config.flag_threshold, dec!(2));
    }

    #[test]
    fn test_invalid_override_fails_deserialization() {
        let result: Result<VerificationConfig, _> =
            serde_json::from_str(r#"{ "compound_multiplier": "0.5" }"#);
        assert!(result.is_err());
    }
}
