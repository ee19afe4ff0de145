use crate::core::types::HttpMethod;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("{method} {url} returned status code None with message: Connection Timeout")]
    Timeout { method: HttpMethod, url: String },

    #[error("{method} {url} returned status code None with message: Connection Error ({message})")]
    Connection {
        method: HttpMethod,
        url: String,
        message: String,
    },

    #[error("{method} {url} returned status code {status} with message: {message}")]
    Http {
        method: HttpMethod,
        url: String,
        status: u16,
        message: String,
    },

    #[error("{method} {url} returned status code {status} with message: Could not decode JSON response: {message}")]
    Decode {
        method: HttpMethod,
        url: String,
        status: u16,
        message: String,
    },

    #[error("{method} {url} rejected the nonce {attempts} times (status {status:?}): {message}")]
    NonceRejected {
        method: HttpMethod,
        url: String,
        status: Option<u16>,
        message: String,
        attempts: u32,
    },

    #[error("Invalid symbol format: {0}")]
    InvalidSymbolFormat(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),
}

impl ExchangeError {
    /// HTTP method of the failed request, when the error came from one.
    pub fn method(&self) -> Option<HttpMethod> {
        match self {
            Self::Timeout { method, .. }
            | Self::Connection { method, .. }
            | Self::Http { method, .. }
            | Self::Decode { method, .. }
            | Self::NonceRejected { method, .. } => Some(*method),
            _ => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Timeout { url, .. }
            | Self::Connection { url, .. }
            | Self::Http { url, .. }
            | Self::Decode { url, .. }
            | Self::NonceRejected { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Status code of the response; `None` for transport failures and local errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::Decode { status, .. } => Some(*status),
            Self::NonceRejected { status, .. } => *status,
            _ => None,
        }
    }

    /// Human readable message, without the method/url decoration of `Display`.
    pub fn message(&self) -> String {
        match self {
            Self::Timeout { .. } => "Connection Timeout".to_string(),
            Self::Connection { message, .. }
            | Self::Http { message, .. }
            | Self::Decode { message, .. }
            | Self::NonceRejected { message, .. } => message.clone(),
            Self::InvalidSymbolFormat(message)
            | Self::NotSupported(message)
            | Self::InvalidParameters(message)
            | Self::AuthError(message) => message.clone(),
            Self::ConfigError(err) => err.to_string(),
        }
    }

    /// Transport failures that happened before any response was received.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Connection { .. })
    }
}
