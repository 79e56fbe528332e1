use crate::domain::cpf::CpfError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid CPF: {0}")]
    CpfError(#[from] CpfError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Output,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RegistryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::CsvError(_) => ErrorCategory::Input,
            Self::ZipError(_) | Self::IoError(_) | Self::SerializationError(_) => {
                ErrorCategory::Output
            }
            Self::CpfError(_) | Self::ValidationError { .. } => ErrorCategory::Validation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    /// Exit code used by the binaries.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::CsvError(_) => {
                "Check that the export is a CSV file with a header row and the expected delimiter"
            }
            Self::IoError(_) => "Check that the input file exists and the output directory is writable",
            Self::ZipError(_) | Self::SerializationError(_) => {
                "Retry the audit; if it keeps failing, report the input file that triggers it"
            }
            Self::CpfError(_) => "Re-type the CPF as 11 digits, e.g. 529.982.247-25",
            Self::MissingConfigError { .. } => "Add the missing key to the configuration file",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => "Fix the configuration value and run again",
            Self::ValidationError { .. } => "Correct the record and submit it again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Could not read the registry export: {}", self),
            ErrorCategory::Output => format!("Could not write the audit report: {}", self),
            ErrorCategory::Validation => format!("Record rejected: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpf_error_converts_and_classifies() {
        let err: RegistryError = CpfError::RepeatedDigits.into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.exit_code(), 2);
        assert!(err.user_friendly_message().starts_with("Record rejected"));
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = RegistryError::MissingConfigError {
            field: "source.input_file".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            err.to_string(),
            "Missing required configuration: source.input_file"
        );
    }
}
