//! Subcommand implementations

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use domain_verification::{evaluate, FactBundle, ReferenceData, Thresholds, VerificationConfig, VerificationResult};
use serde::de::DeserializeOwned;
use tracing::info;

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid {what} in {}", path.display()))
}

/// Reads a fact bundle and reference data from JSON files and evaluates them
pub fn evaluate_files(
    facts: &Path,
    reference: &Path,
    config: &VerificationConfig,
) -> Result<VerificationResult> {
    let bundle: FactBundle = read_json(facts, "fact bundle")?;
    let reference: ReferenceData = read_json(reference, "reference data")?;

    let result = evaluate(&bundle, &reference, config);
    info!(
        claim_id = %result.claim_id,
        verdict = %result.verdict,
        "Evaluation complete"
    );
    Ok(result)
}

/// Renders a result as JSON
pub fn render(result: &VerificationResult, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(json)
}

/// Renders the effective thresholds, suitable as a starting config file
pub fn render_thresholds(config: &VerificationConfig) -> Result<String> {
    let thresholds: &Thresholds = config.thresholds();
    Ok(serde_json::to_string_pretty(thresholds)?)
}

/// Writes `content` to `path`, or to stdout when no path is given
pub fn emit(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => fs::write(path, format!("{content}\n"))
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}
