use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Malformed record '{id}': field '{field}' {reason}")]
    MalformedRecord {
        id: String,
        field: String,
        reason: String,
    },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Data,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub fn malformed_record(
        id: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedRecord {
            id: id.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfiguration { .. }
            | Self::InvalidConfigValue { .. }
            | Self::MissingConfig { .. }
            | Self::ConfigParse { .. } => ErrorCategory::Configuration,
            Self::MalformedRecord { .. } | Self::Csv(_) | Self::Serialization(_) => {
                ErrorCategory::Data
            }
            Self::Io(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MalformedRecord { .. } => ErrorSeverity::High,
            Self::Csv(_) | Self::Serialization(_) => ErrorSeverity::High,
            Self::Io(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Medium,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::InvalidConfiguration { .. } => {
                "Check the report definition: columns, grouping and format settings".to_string()
            }
            Self::MalformedRecord { id, .. } => format!(
                "Fix or remove record '{}' in the data source and run the report again",
                id
            ),
            Self::InvalidConfigValue { field, .. } => {
                format!("Correct the value of '{}' in the configuration file", field)
            }
            Self::MissingConfig { field } => {
                format!("Add '{}' to the configuration file", field)
            }
            Self::ConfigParse { .. } => "Make sure the file is valid TOML".to_string(),
            Self::Io(_) => "Check that the file exists and is readable".to_string(),
            Self::Csv(_) => "Check the CSV header row and column values".to_string(),
            Self::Serialization(_) => "Check that the file contains a JSON array".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MalformedRecord { id, field, .. } => {
                format!("Record '{}' has an unusable '{}' amount", id, field)
            }
            Self::Io(e) => format!("Could not read input: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
