use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Validation failed for '{field}': {message}")]
    ValidationError { field: String, message: String },

    #[error("Store {operation} on table '{table}' failed{}: {message}", status_suffix(.status))]
    StoreError {
        table: String,
        operation: StoreOperation,
        status: Option<u16>,
        message: String,
    },

    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Append,
    Fetch,
}

impl std::fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreOperation::Append => write!(f, "append"),
            StoreOperation::Fetch => write!(f, "fetch"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Store,
    Configuration,
    Io,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TallyError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        TallyError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn store(
        table: &str,
        operation: StoreOperation,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        TallyError::StoreError {
            table: table.to_string(),
            operation,
            status,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            TallyError::ValidationError { .. } => ErrorCategory::Validation,
            TallyError::StoreError { .. } | TallyError::ApiError(_) => ErrorCategory::Store,
            TallyError::ConfigError { .. }
            | TallyError::ConfigValidationError { .. }
            | TallyError::InvalidConfigValueError { .. }
            | TallyError::MissingConfigError { .. } => ErrorCategory::Configuration,
            TallyError::IoError(_) | TallyError::ZipError(_) => ErrorCategory::Io,
            TallyError::CsvError(_) | TallyError::SerializationError(_) => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::High,
            ErrorCategory::Store | ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TallyError::ValidationError { field, message } => {
                format!("Please fill in all fields correctly ({}: {})", field, message)
            }
            TallyError::StoreError {
                operation: StoreOperation::Append,
                message,
                ..
            } => format!("Could not save your submission: {}", message),
            TallyError::StoreError {
                operation: StoreOperation::Fetch,
                ..
            } => "Failed to fetch results".to_string(),
            TallyError::ApiError(_) => "Could not reach the data store".to_string(),
            TallyError::MissingConfigError { field } => {
                format!("Missing required setting: {}", field)
            }
            TallyError::ConfigError { .. }
            | TallyError::ConfigValidationError { .. }
            | TallyError::InvalidConfigValueError { .. } => {
                format!("Configuration problem: {}", self)
            }
            TallyError::IoError(_) | TallyError::ZipError(_) => {
                format!("Could not write output: {}", self)
            }
            TallyError::CsvError(_) | TallyError::SerializationError(_) => {
                format!("Could not encode or decode data: {}", self)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => {
                "Provide a name, a period, at least one day and a time; the available and unavailable day must differ"
            }
            ErrorCategory::Store => {
                "Check the store endpoint, API key and network connection, then try again"
            }
            ErrorCategory::Configuration => {
                "Check the configuration file and command line flags"
            }
            ErrorCategory::Io => "Check that the output directory exists and is writable",
            ErrorCategory::Data => "Check that stored rows match the expected schema",
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" (HTTP {})", code))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, TallyError>;
