use thiserror::Error;

/// Failure reported by the hosted payment SDK.
///
/// `Payment` carries a message meant for the shopper. `Runtime` covers anything
/// else that went wrong inside the SDK call and must not be shown verbatim
/// during intent confirmation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    #[error("{message}")]
    Payment { message: String },
    #[error("unexpected runtime error: {0}")]
    Runtime(String),
}

impl SdkError {
    pub fn payment(message: impl Into<String>) -> Self {
        Self::Payment {
            message: message.into(),
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime(message.into())
    }

    /// The raw message carried by the error, whatever its kind.
    pub fn message(&self) -> &str {
        match self {
            Self::Payment { message } => message,
            Self::Runtime(message) => message,
        }
    }
}

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
