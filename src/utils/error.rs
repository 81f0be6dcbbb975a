use thiserror::Error;

#[derive(Error, Debug)]
pub enum OsintError {
    #[error("Invalid input: {message}")]
    InputError { message: String },

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Network,
    Storage,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl OsintError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::InputError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InputError { .. } | Self::ValidationError { .. } => ErrorCategory::Input,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::HttpClientError(_) => ErrorCategory::Network,
            Self::DatabaseError(_) => ErrorCategory::Storage,
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorCategory::Export
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InputError { .. } | Self::ValidationError { .. } => ErrorSeverity::High,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
            // 客戶端建立失敗通常是暫時性的 (TLS 後端、系統資源)
            Self::HttpClientError(_) => ErrorSeverity::Medium,
            Self::DatabaseError(_) | Self::IoError(_) => ErrorSeverity::Critical,
            Self::SerializationError(_) | Self::CsvError(_) => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InputError { message } => format!("Invalid input: {}", message),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            Self::ValidationError { message } => format!("Validation failed: {}", message),
            Self::HttpClientError(_) => "Could not set up the HTTP client".to_string(),
            Self::DatabaseError(e) => format!("Local search database failed: {}", e),
            Self::IoError(e) => format!("File system error: {}", e),
            Self::SerializationError(_) | Self::CsvError(_) => {
                "Could not serialize search results".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Provide a non-empty username and at least one platform",
            ErrorCategory::Configuration => {
                "Check the config file and command line flags (see --help)"
            }
            ErrorCategory::Network => "Check network connectivity and try again",
            ErrorCategory::Storage => {
                "Check that the database path is writable, or pass --database to use another file"
            }
            ErrorCategory::Export => "Check that the results directory exists and is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, OsintError>;
