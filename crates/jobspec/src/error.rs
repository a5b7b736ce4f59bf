//! Error types for the jobspec crate.

use std::path::PathBuf;
use thiserror::Error;

/// Config loading/validation errors. All of them are fatal for a run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file does not exist: {0}")]
    FileNotFound(String),

    #[error("cannot read config file: {0}")]
    Io(String),

    #[error("cannot parse {format} config: {msg}")]
    Parse { format: &'static str, msg: String },

    #[error("config failed validation with {} issue(s)", .0.len())]
    Invalid(Vec<ValidationIssue>),
}

impl ConfigError {
    /// Validation issues carried by this error, empty for other variants.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            ConfigError::Invalid(issues) => issues,
            _ => &[],
        }
    }
}

/// A single violated validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("Volatility path does not exist: {}", .0.display())]
    ToolMissing(PathBuf),

    #[error("Volatility path is not an executable file: {}", .0.display())]
    ToolNotExecutable(PathBuf),

    #[error("Output path not set")]
    OutputPathEmpty,

    #[error("RAM path does not exist: {}", .0.display())]
    ImageMissing(PathBuf),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_counts_issues() {
        let err = ConfigError::Invalid(vec![
            ValidationIssue::OutputPathEmpty,
            ValidationIssue::ImageMissing(PathBuf::from("/nope/mem.raw")),
        ]);
        assert_eq!(err.to_string(), "config failed validation with 2 issue(s)");
        assert_eq!(err.issues().len(), 2);
    }

    #[test]
    fn test_issue_messages_name_the_path() {
        let issue = ValidationIssue::ImageMissing(PathBuf::from("/cases/mem.raw"));
        assert!(issue.to_string().contains("/cases/mem.raw"));
        assert!(ConfigError::FileNotFound("x".into()).issues().is_empty());
    }
}
