use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubbudError {
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("No domains to ingest from {source_name}")]
    EmptyInput { source_name: String },

    #[error("Failed to commit domain '{domain}': {message}")]
    Commit { domain: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Store,
    Input,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SubbudError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SubbudError::StoreUnavailable { .. }
            | SubbudError::Store { .. }
            | SubbudError::Commit { .. } => ErrorCategory::Store,
            SubbudError::EmptyInput { .. } => ErrorCategory::Input,
            SubbudError::ConfigError { .. }
            | SubbudError::InvalidConfigValueError { .. }
            | SubbudError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SubbudError::IoError(_) | SubbudError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SubbudError::Commit { .. } => ErrorSeverity::Low,
            SubbudError::StoreUnavailable { .. } => ErrorSeverity::Medium,
            SubbudError::Store { .. }
            | SubbudError::EmptyInput { .. }
            | SubbudError::ConfigError { .. }
            | SubbudError::InvalidConfigValueError { .. }
            | SubbudError::MissingConfigError { .. } => ErrorSeverity::High,
            SubbudError::IoError(_) | SubbudError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SubbudError::StoreUnavailable { .. } => {
                "Redis server is not running. Please start the Redis server.".to_string()
            }
            SubbudError::Store { message } => format!("Redis rejected the request: {}", message),
            SubbudError::MissingConfigError { field } => {
                format!("You must provide a {}.", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SubbudError::StoreUnavailable { .. } => {
                "Check --host/--port (or SUBBUD_REDIS_HOST/SUBBUD_REDIS_PORT) and that Redis accepts connections"
            }
            SubbudError::Store { .. } => {
                "Make sure the project key holds a set and the credentials allow writes"
            }
            SubbudError::EmptyInput { .. } => {
                "Pass a newline-delimited file with at least one domain"
            }
            SubbudError::Commit { .. } => "Re-run the same add; already stored domains are skipped",
            SubbudError::ConfigError { .. }
            | SubbudError::InvalidConfigValueError { .. }
            | SubbudError::MissingConfigError { .. } => {
                "Run with --help to see the accepted options"
            }
            SubbudError::IoError(_) => "Check file permissions and the output directory",
            SubbudError::SerializationError(_) => "Retry without --json",
        }
    }
}

impl From<redis::RedisError> for SubbudError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error()
            || err.is_connection_refusal()
            || err.is_connection_dropped()
            || err.is_timeout()
        {
            SubbudError::StoreUnavailable {
                message: err.to_string(),
            }
        } else {
            SubbudError::Store {
                message: err.to_string(),
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SubbudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_share_category() {
        let unavailable = SubbudError::StoreUnavailable {
            message: "refused".to_string(),
        };
        let commit = SubbudError::Commit {
            domain: "a.com".to_string(),
            message: "boom".to_string(),
        };
        assert_eq!(unavailable.category(), ErrorCategory::Store);
        assert_eq!(commit.category(), ErrorCategory::Store);
        assert!(commit.severity() < unavailable.severity());
    }

    #[test]
    fn test_redis_error_conversion() {
        let io = redis::RedisError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert!(matches!(
            SubbudError::from(io),
            SubbudError::StoreUnavailable { .. }
        ));

        let wrong_type = redis::RedisError::from((
            redis::ErrorKind::TypeError,
            "WRONGTYPE Operation against a key holding the wrong kind of value",
        ));
        assert!(matches!(
            SubbudError::from(wrong_type),
            SubbudError::Store { .. }
        ));
    }

    #[test]
    fn test_missing_config_message() {
        let err = SubbudError::MissingConfigError {
            field: "project name".to_string(),
        };
        assert_eq!(err.user_friendly_message(), "You must provide a project name.");
    }
}
