use serde::{Deserialize, Serialize};

/// Error category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    ConfigMissing,
    UnsupportedConfigKind,
    DecodeFailure,
    SourceRequired,
    DocumentParseFailure,
    EngineFailure,
    ReserializeFailure,
    ConfigurationError,
    IoError,
}

impl ErrorCategory {
    /// Stable diagnostic code reported alongside the message.
    pub fn code(self) -> &'static str {
        match self {
            ErrorCategory::ConfigMissing => "KCL-CFG-001",
            ErrorCategory::UnsupportedConfigKind => "KCL-CFG-002",
            ErrorCategory::DecodeFailure => "KCL-CFG-003",
            ErrorCategory::SourceRequired => "KCL-CFG-004",
            ErrorCategory::DocumentParseFailure => "KCL-DOC-001",
            ErrorCategory::ReserializeFailure => "KCL-DOC-002",
            ErrorCategory::EngineFailure => "KCL-ENG-001",
            ErrorCategory::ConfigurationError => "KCL-RT-001",
            ErrorCategory::IoError => "KCL-IO-001",
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
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Error,
    Warning,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Warning => write!(f, "warning"),
        }
    }
}
