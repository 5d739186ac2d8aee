//! REST endpoint configuration for the servald daemon.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ConfigError, SourceLocator};

/// Default host the daemon's REST interface listens on.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port of the daemon's REST interface.
pub const DEFAULT_PORT: u16 = 4110;

/// Environment variables read by [`RestfulConfig::from_env`].
pub const ENV_HOST: &str = "SERVALD_REST_HOST";
pub const ENV_PORT: &str = "SERVALD_REST_PORT";
pub const ENV_USER: &str = "SERVALD_REST_USER";
pub const ENV_PASSWORD: &str = "SERVALD_REST_PASSWORD";

/// Connection settings for the servald REST interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct RestfulConfig {
    /// Host name or address of the daemon.
    pub host: String,

    /// TCP port of the REST interface.
    pub port: u16,

    /// Basic-auth user name.
    pub username: String,

    /// Basic-auth password. Never serialised.
    #[serde(skip_serializing)]
    pub password: String,
}

impl Default for RestfulConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            username: String::new(),
            password: String::new(),
        }
    }
}

impl RestfulConfig {
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Build a config from the `SERVALD_REST_*` environment variables,
    /// falling back to the defaults for any that are unset.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidPort`] if `SERVALD_REST_PORT` is not a
    /// valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads variables through
    /// `lookup`.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidPort`] if the port value is not a
    /// valid port number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(host) = lookup(ENV_HOST) {
            config.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            config.port = parse_port(&port)?;
        }
        if let Some(user) = lookup(ENV_USER) {
            config.username = user;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            config.password = password;
        }
        tracing::debug!(host = %config.host, port = config.port, "loaded servald REST config");
        Ok(config)
    }

    /// Value for the `Authorization` header of every REST request.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        let userpass = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(userpass))
    }

    /// Base URL of the REST interface, e.g. `http://127.0.0.1:4110/`.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidEndpoint`] if the host cannot form a URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = format!("http://{}:{}/", self.host, self.port);
        Url::parse(&raw).map_err(|e| ConfigError::InvalidEndpoint {
            reason: format!("{raw}: {e}"),
        })
    }

    /// Locator of a REST endpoint with percent-encoded query parameters.
    ///
    /// `path` is always a path on the configured daemon: a leading `/` is
    /// optional, and `?`, `#` or a scheme inside it are encoded as path
    /// characters, so the host, port and query cannot be changed through it.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidEndpoint`] if the host cannot form a
    /// URL or `path` contains a `.` or `..` segment.
    pub fn endpoint(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<SourceLocator, ConfigError> {
        let path = path.trim_start_matches('/');
        if path.split('/').any(is_dot_segment) {
            return Err(ConfigError::InvalidEndpoint {
                reason: format!("{path}: dot segments are not allowed"),
            });
        }
        let mut url = self.base_url()?;
        url.set_path(&format!("/{path}"));
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(SourceLocator::from(url))
    }
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        "." | ".." | "%2e" | "%2e%2e" | ".%2e" | "%2e."
    )
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    match value.trim().parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(ConfigError::InvalidPort {
            value: value.to_owned(),
        }),
    }
}
