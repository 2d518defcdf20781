use serde::{Deserialize, Serialize};

pub use keel_types::{Priority, SinkSeverity};

/// Error category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    ConfigurationError,
    InvalidWorkingCopy,
    NotAWorkingCopy,
    VcsCommandError,
    UnknownCommandFailure,
    DependencyMissing,
    ValidationError,
    IoError,
    InternalError,
}

impl ErrorCategory {
    /// Stable error code carried by every error of this category.
    pub fn code(self) -> &'static str {
        match self {
            ErrorCategory::ConfigurationError => "KEEL-CFG-001",
            ErrorCategory::InvalidWorkingCopy => "KEEL-VCS-001",
            ErrorCategory::NotAWorkingCopy => "KEEL-VCS-002",
            ErrorCategory::VcsCommandError => "KEEL-VCS-003",
            ErrorCategory::UnknownCommandFailure => "KEEL-VCS-004",
            ErrorCategory::DependencyMissing => "KEEL-DEP-001",
            ErrorCategory::ValidationError => "KEEL-VAL-001",
            ErrorCategory::IoError => "KEEL-IO-001",
            ErrorCategory::InternalError => "KEEL-INT-001",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Error severity enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// Aborts the whole build run.
    Fatal,
    /// Fails the issuing task.
    Error,
    Warning,
}
