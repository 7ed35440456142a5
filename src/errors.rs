// src/errors.rs
use thiserror::Error;

/// Failure category reported to the caller alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadInput,
    ExecutionTimeout,
    InternalFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadInput => "bad-input",
            ErrorKind::ExecutionTimeout => "execution-timeout",
            ErrorKind::InternalFailure => "internal-failure",
        }
    }
}

#[derive(Error, Debug)]
#[allow(dead_code)]
pub enum ConvertError {
    #[error("No code provided")]
    NoScript,

    #[error("Execution failed:\n{stderr}")]
    Execution { stderr: String },

    #[error("Execution timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error(
        "No PDF file was generated by the script. Ensure your code saves a PDF (e.g., output(\"file.pdf\"))."
    )]
    ArtifactNotFound,

    #[error("Failed to synthesize a document from script output: {0}")]
    Synthesis(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ConvertError {
    /// Category used for the structured error payload and status code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::NoScript
            | ConvertError::Execution { .. }
            | ConvertError::ArtifactNotFound => ErrorKind::BadInput,
            ConvertError::Timeout { .. } => ErrorKind::ExecutionTimeout,
            ConvertError::Synthesis(_) | ConvertError::Io(_) | ConvertError::Config(_) => {
                ErrorKind::InternalFailure
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_wire_strings() {
        assert_eq!(ConvertError::NoScript.kind().as_str(), "bad-input");
        assert_eq!(
            ConvertError::Timeout { secs: 30 }.kind().as_str(),
            "execution-timeout"
        );
        assert_eq!(
            ConvertError::Synthesis("boom".into()).kind().as_str(),
            "internal-failure"
        );
    }

    #[test]
    fn execution_error_surfaces_stderr_verbatim() {
        let err = ConvertError::Execution {
            stderr: "Traceback (most recent call last):\n  ValueError".to_string(),
        };
        assert!(err.to_string().contains("ValueError"));
    }
}
