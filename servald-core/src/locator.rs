use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a manifest or REST response came from, usually a URL.
///
/// The value is opaque: it is stored exactly as supplied and never
/// validated, so empty or non-URL text is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceLocator(String);

impl SourceLocator {
    /// Creates a `SourceLocator` from any string-like value.
    #[must_use]
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// Returns the locator as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceLocator {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for SourceLocator {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<url::Url> for SourceLocator {
    fn from(url: url::Url) -> Self {
        Self(url.into())
    }
}

impl AsRef<str> for SourceLocator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
