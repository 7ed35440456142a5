// src/resolver.rs
//! Turns a finished run into an artifact or a terminal error: a PDF the
//! script produced wins; otherwise stdout is rendered into a document; failing
//! that, the run is classified.

use crate::config::AppConfig;
use crate::errors::{ConvertError, Result};
use crate::models::{Artifact, ExecutionResult};
use crate::patch::{self, DEFAULT_OUTPUT_NAME};
use crate::sandbox::{self, Workspace};
use std::path::Path;

/// Resolves one execution into exactly one of artifact or error. The
/// workspace is read before the caller drops it.
pub async fn resolve(
    config: &AppConfig,
    result: &ExecutionResult,
    workspace: &Workspace,
) -> Result<Artifact> {
    if result.timed_out {
        return Err(ConvertError::Timeout {
            secs: config.timeout_secs,
        });
    }

    if let Some(artifact) = locate_artifact(workspace.path())? {
        return Ok(artifact);
    }

    classify(result)?;

    // Zero exit, no document, usable stdout: render the captured text.
    synthesize(config, &result.stdout).await
}

/// Scans the directory for a produced PDF and reads it out. With several
/// matches the pick follows directory order, which is not guaranteed stable.
pub fn locate_artifact(dir: &Path) -> Result<Option<Artifact>> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !path.is_file() || !is_pdf {
            continue;
        }
        let bytes = std::fs::read(&path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string());
        return Ok(Some(Artifact::pdf(bytes, filename)));
    }
    Ok(None)
}

/// Classifies a run that produced no document. Returns `Ok(())` only when the
/// captured stdout is worth synthesizing from.
fn classify(result: &ExecutionResult) -> Result<()> {
    if !result.success() {
        return Err(ConvertError::Execution {
            stderr: result.stderr.clone(),
        });
    }
    if result.stdout.trim().is_empty() {
        return Err(ConvertError::ArtifactNotFound);
    }
    Ok(())
}

/// Renders captured stdout as a plain monospaced document by running the
/// generated fallback script through the same sandbox.
async fn synthesize(config: &AppConfig, stdout: &str) -> Result<Artifact> {
    let script = patch::synthesis_script(stdout);
    let (result, workspace) = sandbox::run_script(config, &script).await?;

    if result.timed_out || !result.success() {
        return Err(ConvertError::Synthesis(result.stderr));
    }
    match locate_artifact(workspace.path())? {
        Some(artifact) => Ok(artifact),
        None => Err(ConvertError::Synthesis(
            "fallback script produced no document".to_string(),
        )),
    }
}
