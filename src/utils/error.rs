use serde::Serialize;
use thiserror::Error;

/// Coarse classification shared by row-level and run-level errors. Only
/// `ValueFormat` and `MissingField` are row-local.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ValueFormat,
    MissingField,
    Structural,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    High,
    Critical,
}

/// Failure to normalize a single record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("invalid duration {value:?}: {reason}")]
    InvalidDuration { value: String, reason: String },

    #[error("missing field {field:?}")]
    MissingField { field: String },
}

impl RowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RowError::InvalidTimestamp { .. } | RowError::InvalidDuration { .. } => {
                ErrorKind::ValueFormat
            }
            RowError::MissingField { .. } => ErrorKind::MissingField,
        }
    }
}

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value {value:?} for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl EtlError {
    /// Always `Structural` or `Config`; row-local errors never end a run.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EtlError::CsvError(_) | EtlError::IoError(_) | EtlError::SerializationError(_) => {
                ErrorKind::Structural
            }
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorKind::Config
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.kind() {
            ErrorKind::Config => ErrorSeverity::High,
            _ => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for a run that ended with this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Critical => 1,
            ErrorSeverity::High => 2,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::CsvError(e) => format!("Could not read the CSV input: {}", e),
            EtlError::IoError(e) => format!("Could not read or write a stream: {}", e),
            EtlError::SerializationError(e) => format!("Could not write the run report: {}", e),
            EtlError::ConfigError { message } => format!("Invalid configuration: {}", message),
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid configuration value for '{}': {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::CsvError(_) => "Check that the input is comma-separated with a header line",
            EtlError::IoError(_) => "Check that the input exists and the output location is writable",
            EtlError::SerializationError(_) => "Check the --report path",
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line flags and retry"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
