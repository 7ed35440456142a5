// src/models.rs
use serde::Deserialize;
use std::time::Duration;

/// A single conversion request as received from the caller. Immutable.
#[derive(Deserialize, Debug, Clone)]
pub struct Submission {
    /// The document-generation script, possibly wrapped in markdown fences.
    /// Absent or empty submissions are rejected as bad input.
    #[serde(default)]
    pub code: Option<String>,

    /// Optional font-size override applied during preprocessing.
    #[serde(default)]
    pub font_size: Option<u32>,
}

/// The fully assembled script text handed to the sandbox: runtime preamble,
/// then cleaned user code, then the optional auto-runner epilogue.
#[derive(Debug, Clone)]
pub struct PreparedScript {
    text: String,
}

impl PreparedScript {
    pub fn new(text: String) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Captured outcome of one child-process run.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Exit code of the child, if it exited normally.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
    pub timed_out: bool,
    pub finished_at: String,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// The generated binary document returned to the caller.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub media_type: &'static str,
}

impl Artifact {
    pub fn pdf(bytes: Vec<u8>, filename: String) -> Self {
        Self {
            bytes,
            filename,
            media_type: "application/pdf",
        }
    }
}
