use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid payload: {0}")]
    InvalidPayload(serde_json::Error),

    #[error("Config file error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("SSH error: {0}")]
    Ssh(#[from] ssh2::Error),

    #[error("Transfer {operation} failed: {message}")]
    TransferError { operation: String, message: String },

    #[error("Transfer session is already closed")]
    SessionClosed,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Which layer an error belongs to, and therefore who handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Fatal at startup.
    Configuration,
    /// Contained by the request handler.
    Transfer,
    /// Propagated to the caller.
    LocalIo,
    /// The webhook body is not a list of items.
    Payload,
}

impl RelayError {
    pub fn transfer(operation: &str, message: impl Into<String>) -> Self {
        RelayError::TransferError {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            RelayError::TomlError(_)
            | RelayError::ConfigError { .. }
            | RelayError::MissingConfigError { .. }
            | RelayError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            RelayError::Ssh(_) | RelayError::TransferError { .. } | RelayError::SessionClosed => {
                ErrorCategory::Transfer
            }
            RelayError::IoError(_) | RelayError::SerializationError(_) => ErrorCategory::LocalIo,
            RelayError::InvalidPayload(_) => ErrorCategory::Payload,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RelayError::MissingConfigError { field } => {
                format!("Some SFTP settings are missing: {} is not set", field)
            }
            RelayError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting {} is invalid ({})", field, reason)
            }
            RelayError::TomlError(e) => format!("The configuration file could not be read: {}", e),
            RelayError::ConfigError { message } => message.clone(),
            RelayError::IoError(e) => format!("A local file could not be written: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check SFTP_HOST, SFTP_USERNAME, SFTP_PASSWORD and the --config file"
            }
            ErrorCategory::Transfer => {
                "Check that the SFTP server is reachable and the credentials are accepted"
            }
            ErrorCategory::LocalIo => "Check permissions and free space in the output directory",
            ErrorCategory::Payload => {
                "Send a JSON array of objects with string fields language and content"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
