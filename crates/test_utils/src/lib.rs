//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claim verification test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for claims, vehicles and policies
//! - `builders`: Builder patterns for fact bundles and reference data
//! - `assertions`: Custom assertion helpers for verification results
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
