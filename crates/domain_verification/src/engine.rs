//! Evaluation entry point
//!
//! The engine holds no state. Inputs are borrowed for the duration of the
//! call and nothing outlives it except the returned result, so any number
//! of threads may evaluate claims at once.

use tracing::{info, instrument};

use crate::checks::CheckContext;
use crate::config::VerificationConfig;
use crate::decision;
use crate::facts::FactBundle;
use crate::reference::ReferenceData;
use crate::registry;
use crate::result::VerificationResult;
use crate::scorer;

/// Runs all checks, scores them and resolves a verdict
///
/// Evaluation cannot fail: every input has already been validated when it
/// was constructed.
#[instrument(skip_all, fields(claim_id = %bundle.claim().claim_id))]
pub fn evaluate(
    bundle: &FactBundle,
    reference: &ReferenceData,
    config: &VerificationConfig,
) -> VerificationResult {
    let ctx = CheckContext::new(bundle, reference, config);
    let outcomes = registry::run_all(&ctx);
    let card = scorer::score(&outcomes, config.thresholds());
    let decision = decision::resolve(&outcomes, &card, config.thresholds());

    info!(
        verdict = %decision.verdict,
        final_score = %card.final_score,
        confidence = %card.confidence_score,
        failed = card.total_checks - card.passed_checks,
        "Claim verified"
    );

    let claim = bundle.claim();
    VerificationResult {
        claim_id: claim.claim_id,
        submitted_at: claim.submitted_at,
        verdict: decision.verdict,
        review_priority: decision.review_priority,
        confidence_level: decision.confidence_level,
        confidence_score: card.confidence_score,
        raw_score: card.raw_score,
        final_score: card.final_score,
        compounding_applied: card.compounding_applied,
        auto_approved: decision.auto_approved,
        requires_monitoring: decision.requires_monitoring,
        reasoning: decision.reasoning,
        outcomes,
    }
}
