//! Policy record and claim history supplied by the caller

use chrono::{DateTime, Utc};
use core_kernel::{ClaimId, DateRange, Money, PartyId, PolicyId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    Active,
    Expired,
    Cancelled,
    Suspended,
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PolicyStatus::Active => "active",
            PolicyStatus::Expired => "expired",
            PolicyStatus::Cancelled => "cancelled",
            PolicyStatus::Suspended => "suspended",
        };
        f.write_str(label)
    }
}

/// The insured vehicle as registered on the policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleOnFile {
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub color: Option<String>,
    pub plate: String,
    #[serde(default)]
    pub vin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub policy_id: PolicyId,
    pub policyholder_id: PartyId,
    pub vehicle: VehicleOnFile,
    pub status: PolicyStatus,
    pub coverage_ceiling: Money,
    /// Validity window, both ends inclusive
    pub validity: DateRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorClaimStatus {
    Pending,
    Processing,
    Approved,
    Flagged,
    Rejected,
    Settled,
    Closed,
}

impl PriorClaimStatus {
    /// Still awaiting a decision
    pub fn is_open(&self) -> bool {
        matches!(self, PriorClaimStatus::Pending | PriorClaimStatus::Processing)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, PriorClaimStatus::Rejected)
    }
}

impl fmt::Display for PriorClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PriorClaimStatus::Pending => "pending",
            PriorClaimStatus::Processing => "processing",
            PriorClaimStatus::Approved => "approved",
            PriorClaimStatus::Flagged => "flagged",
            PriorClaimStatus::Rejected => "rejected",
            PriorClaimStatus::Settled => "settled",
            PriorClaimStatus::Closed => "closed",
        };
        f.write_str(label)
    }
}

/// A previously filed claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorClaim {
    pub claim_id: ClaimId,
    pub policyholder_id: PartyId,
    pub plate: String,
    pub status: PriorClaimStatus,
    pub filed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDataParts {
    pub policy: PolicyRecord,
    #[serde(default)]
    pub claim_history: Vec<PriorClaim>,
}

/// Validated reference data for one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReferenceDataParts", into = "ReferenceDataParts")]
pub struct ReferenceData {
    policy: PolicyRecord,
    claim_history: Vec<PriorClaim>,
}

impl ReferenceData {
    pub fn new(policy: PolicyRecord, claim_history: Vec<PriorClaim>) -> Result<Self, ValidationError> {
        let parts = ReferenceDataParts {
            policy,
            claim_history,
        };
        validation::validate_reference(&parts)?;
        Ok(Self {
            policy: parts.policy,
            claim_history: parts.claim_history,
        })
    }

    pub fn policy(&self) -> &PolicyRecord {
        &self.policy
    }

    pub fn claim_history(&self) -> &[PriorClaim] {
        &self.claim_history
    }
}

impl TryFrom<ReferenceDataParts> for ReferenceData {
    type Error = ValidationError;

    fn try_from(parts: ReferenceDataParts) -> Result<Self, Self::Error> {
        Self::new(parts.policy, parts.claim_history)
    }
}

impl From<ReferenceData> for ReferenceDataParts {
    fn from(reference: ReferenceData) -> Self {
        ReferenceDataParts {
            policy: reference.policy,
            claim_history: reference.claim_history,
        }
    }
}
