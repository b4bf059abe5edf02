//! Core Kernel - Foundational value types for claim verification
//!
//! This crate provides the building blocks shared by the verification engine
//! and its callers:
//! - Money types with precise decimal arithmetic
//! - Inclusive date windows for policy validity
//! - Strongly-typed identifiers for claims, policies and parties

pub mod money;
pub mod temporal;
pub mod identifiers;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{DateRange, TemporalError};
pub use identifiers::{ClaimId, PolicyId, PartyId, ImageId};
