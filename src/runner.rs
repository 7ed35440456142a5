// src/runner.rs
use crate::config::AppConfig;
use crate::errors::{ConvertError, Result};
use crate::models::{Artifact, Submission};
use crate::{patch, preprocess, resolver, sandbox};
use std::time::Instant;

/// Runs one submission end-to-end: preprocess, inject patches, execute in a
/// scratch workspace, resolve the outcome. Every submission yields exactly one
/// of artifact or error; the workspace is torn down on every path.
pub async fn convert(config: &AppConfig, submission: &Submission) -> Result<Artifact> {
    let code = submission.code.as_deref().unwrap_or("");
    if code.trim().is_empty() {
        return Err(ConvertError::NoScript);
    }

    let started = Instant::now();

    let cleaned = preprocess::clean_script(code, submission.font_size);
    if cleaned.is_empty() {
        return Err(ConvertError::NoScript);
    }

    let prepared = patch::assemble(&cleaned, config.auto_run);
    log::debug!(
        "prepared script: {} bytes (user code {} bytes)",
        prepared.text().len(),
        cleaned.len()
    );

    let (result, workspace) = sandbox::run_script(config, &prepared).await?;
    log::info!(
        "script finished at {} in {:?} (exit {:?}, timed_out {})",
        result.finished_at,
        result.elapsed,
        result.exit_code,
        result.timed_out
    );

    // Read the artifact out before the workspace drops at the end of scope.
    let artifact = resolver::resolve(config, &result, &workspace).await?;

    log::info!(
        "conversion produced {} ({} bytes) in {:?}",
        artifact.filename,
        artifact.bytes.len(),
        started.elapsed()
    );
    Ok(artifact)
}
