//! Error types for the todo API client.
//!
//! # Design
//! Server-reported failures and transport failures are separate variants
//! because only the former reaches the notification sink. `Server` keeps the
//! exact status code and the server's `error` message so the caller sees the
//! same values the user was shown.

/// Errors returned by `TodoClient` parse methods and `ApiClient` calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// No response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Status code of a server-reported error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A round trip that produced no HTTP response at all.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection, DNS, TLS or socket failure.
    #[error("request could not be delivered: {0}")]
    Io(String),

    /// The blocking task running the round trip panicked or was cancelled.
    #[error("request task aborted: {0}")]
    Aborted(String),
}

/// Invalid client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("invalid base url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base url {0:?} must use http or https")]
    UnsupportedScheme(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Figment(Box::new(err))
    }
}
