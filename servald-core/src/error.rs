//! Error types for the daemon interface layer.

use crate::SourceLocator;

/// Coarse category of a client error, used by callers to pick a recovery
/// policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The daemon or the channel to it misbehaved.
    InterfaceMalfunction,
    /// The content supplied to or returned by an operation is not valid.
    InvalidContent,
}

/// Reports which [`ErrorClass`] an error belongs to.
pub trait Classify {
    fn class(&self) -> ErrorClass;

    fn is_interface_malfunction(&self) -> bool {
        self.class() == ErrorClass::InterfaceMalfunction
    }
}

/// Marker for errors that represent a malfunction of the servald interface.
///
/// Only [`InterfaceError`] implements this. Content errors such as an
/// invalid Rhizome manifest must not, so that generic interface-error
/// handling cannot absorb them.
pub trait InterfaceMalfunction: std::error::Error + Send + Sync + 'static {}

/// Failures of the servald REST interface itself.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum InterfaceError {
    /// The daemon answered with a status code the operation does not accept.
    #[error("request failed with HTTP {status} from {url}")]
    RequestFailed { status: u16, url: SourceLocator },

    /// The response carried no `Content-Type`.
    #[error("missing content type in response from {url}")]
    MissingContentType { url: SourceLocator },

    /// The response was not `application/json`.
    #[error("unexpected content type {mime_type:?} in response from {url}")]
    InvalidContentType {
        mime_type: String,
        url: SourceLocator,
    },

    /// The response body could not be parsed as JSON.
    #[error("malformed JSON in response from {url}")]
    MalformedJson {
        url: SourceLocator,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON was well formed but not what the protocol requires.
    #[error("invalid JSON in response from {url}: {reason}")]
    InvalidJson { reason: String, url: SourceLocator },

    /// The daemon reported an internal failure.
    #[error("servald failure at {url}: {message}")]
    DaemonFailure { message: String, url: SourceLocator },
}

impl InterfaceError {
    /// The locator of the request that failed.
    #[must_use]
    pub fn url(&self) -> &SourceLocator {
        match self {
            Self::RequestFailed { url, .. }
            | Self::MissingContentType { url }
            | Self::InvalidContentType { url, .. }
            | Self::MalformedJson { url, .. }
            | Self::InvalidJson { url, .. }
            | Self::DaemonFailure { url, .. } => url,
        }
    }
}

impl InterfaceMalfunction for InterfaceError {}

impl Classify for InterfaceError {
    fn class(&self) -> ErrorClass {
        ErrorClass::InterfaceMalfunction
    }
}

/// Errors in client configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A port value could not be parsed as a TCP port.
    #[error("invalid port {value:?}: must be an integer in 1..=65535")]
    InvalidPort { value: String },

    /// The configured host and path do not form a valid URL.
    #[error("invalid REST endpoint: {reason}")]
    InvalidEndpoint { reason: String },
}
