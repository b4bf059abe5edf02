//! Domain Verification - Claim verification decision engine
//!
//! This crate turns the facts extracted from a motor claim submission into
//! an auditable APPROVED / FLAGGED / REJECTED decision:
//! - Validated, immutable fact bundles and reference data
//! - Sixteen independent checks grouped into phases A through E
//! - Exact-decimal severity scoring with a compounding multiplier
//! - A first-match decision matrix with review priorities
//!
//! The single entry point is [`evaluate`]. It is pure and synchronous and
//! never reads the clock or the environment.

pub mod checks;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod facts;
pub mod finding;
pub mod reference;
pub mod registry;
pub mod result;
pub mod scorer;
pub mod validation;

#[cfg(test)]
mod testing;

pub use config::{Thresholds, VerificationConfig};
pub use decision::{ConfidenceLevel, ReviewPriority, Verdict};
pub use engine::evaluate;
pub use error::{ConfigurationError, ValidationError, VerificationError};
pub use facts::{FactBundle, FactBundleParts};
pub use finding::{CheckId, CheckOutcome, Finding, FindingCategory, Phase, Severity};
pub use reference::{ReferenceData, ReferenceDataParts};
pub use result::VerificationResult;
