// src/sandbox.rs
//! Runs a prepared script as an isolated child process rooted in a scratch
//! directory, with a hard wall-clock timeout and captured stdio.

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{ExecutionResult, PreparedScript};
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::process::Command;

const SCRIPT_NAME: &str = "script.py";

/// A fresh, empty working directory backing exactly one script run. The
/// directory is removed when the workspace drops, on every exit path; any
/// artifact must be read out before then.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn create() -> Result<Self> {
        let dir = TempDir::with_prefix("inkpress-")?;
        Ok(Workspace { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Writes the script into a fresh workspace and runs it there. The child is
/// killed once the configured wall-clock limit elapses; its output up to that
/// point is discarded and the result carries only the timed-out flag.
pub async fn run_script(
    config: &AppConfig,
    script: &PreparedScript,
) -> Result<(ExecutionResult, Workspace)> {
    let workspace = Workspace::create()?;
    let result = run_in(config, script, &workspace).await?;
    Ok((result, workspace))
}

/// Runs the script inside an existing workspace; `run_script` pairs this with
/// a freshly created one.
pub async fn run_in(
    config: &AppConfig,
    script: &PreparedScript,
    workspace: &Workspace,
) -> Result<ExecutionResult> {
    let script_path = workspace.path().join(SCRIPT_NAME);
    tokio::fs::write(&script_path, script.text()).await?;

    let started = Instant::now();
    let child = Command::new(&config.python_bin)
        .arg(SCRIPT_NAME)
        .current_dir(workspace.path())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let limit = Duration::from_secs(config.timeout_secs);
    // Dropping the wait future on timeout drops the child handle, which
    // kills the process via kill_on_drop.
    let outcome = tokio::time::timeout(limit, child.wait_with_output()).await;

    let finished_at = chrono::Utc::now().to_rfc3339();
    let elapsed = started.elapsed();

    match outcome {
        Ok(output) => {
            let output = output?;
            Ok(ExecutionResult {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                elapsed,
                timed_out: false,
                finished_at,
            })
        }
        Err(_) => {
            log::warn!(
                "child exceeded {}s wall-clock limit, killed",
                config.timeout_secs
            );
            Ok(ExecutionResult {
                exit_code: None,
                stdout: String::new(),
                stderr: String::new(),
                elapsed,
                timed_out: true,
                finished_at,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn long_running_child_is_flagged_and_killed() {
        use std::os::unix::fs::PermissionsExt;

        // Stand-in interpreter that never finishes within the limit.
        let bin_dir = TempDir::with_prefix("inkpress-test-").unwrap();
        let sleeper = bin_dir.path().join("slow-interpreter.sh");
        std::fs::write(&sleeper, "#!/bin/sh\nsleep 10\n").unwrap();
        std::fs::set_permissions(&sleeper, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = AppConfig {
            python_bin: sleeper.to_string_lossy().into_owned(),
            timeout_secs: 1,
            ..AppConfig::default()
        };
        let script = PreparedScript::new("while True:\n    pass\n".to_string());

        let started = Instant::now();
        let (result, _workspace) = run_script(&config, &script).await.unwrap();

        assert!(result.timed_out);
        assert_eq!(result.exit_code, None);
        assert!(!result.success());
        // Killed at roughly the configured limit, not after the sleep.
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn workspace_is_removed_on_drop() {
        let workspace = Workspace::create().unwrap();
        let path = workspace.path().to_path_buf();
        std::fs::write(path.join("leftover.pdf"), b"%PDF-1.4").unwrap();
        assert!(path.exists());
        drop(workspace);
        assert!(!path.exists());
    }

    #[test]
    fn workspaces_are_independent() {
        let a = Workspace::create().unwrap();
        let b = Workspace::create().unwrap();
        assert_ne!(a.path(), b.path());
    }
}
