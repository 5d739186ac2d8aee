//! Error types for the Rhizome subsystem.
//!
//! None of these are [`InterfaceError`]s and none implement
//! [`servald_core::InterfaceMalfunction`]: a Rhizome error means the
//! content or request was rejected, not that the daemon interface broke,
//! and callers have to handle it explicitly.

use std::error::Error as StdError;

use servald_core::{Classify, ErrorClass, InterfaceError, SourceLocator};

/// Message carried by every [`InvalidManifestError`].
pub const INVALID_MANIFEST_MESSAGE: &str = "invalid manifest";
pub const FAKE_MANIFEST_MESSAGE: &str = "fake manifest";
pub const READ_ONLY_MESSAGE: &str = "bundle is read-only";
pub const MANIFEST_TOO_BIG_MESSAGE: &str = "manifest too big";
pub const ENCRYPTION_MESSAGE: &str = "payload encryption failed";
pub const DECRYPTION_MESSAGE: &str = "payload decryption failed";

type Cause = Box<dyn StdError + Send + Sync + 'static>;

/// A Rhizome API operation was given, or received, a manifest that fails
/// validation.
///
/// Immutable once built. The locator is stored exactly as supplied.
#[derive(Debug, thiserror::Error)]
#[error("invalid manifest: {url}")]
pub struct InvalidManifestError {
    url: SourceLocator,
    #[source]
    cause: Option<Cause>,
}

impl InvalidManifestError {
    #[must_use]
    pub fn new(url: impl Into<SourceLocator>) -> Self {
        Self {
            url: url.into(),
            cause: None,
        }
    }

    /// Attach the underlying error that made the manifest invalid.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Where the offending manifest came from.
    #[must_use]
    pub fn source_location(&self) -> &SourceLocator {
        &self.url
    }

    /// Always [`INVALID_MANIFEST_MESSAGE`].
    #[must_use]
    pub fn message(&self) -> &'static str {
        INVALID_MANIFEST_MESSAGE
    }

    #[must_use]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl Classify for InvalidManifestError {
    fn class(&self) -> ErrorClass {
        ErrorClass::InvalidContent
    }
}

/// Errors reported by Rhizome API operations about the bundle itself.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RhizomeError {
    /// The manifest failed validation.
    #[error(transparent)]
    InvalidManifest(#[from] InvalidManifestError),

    /// The manifest's signature or author does not verify.
    #[error("fake manifest: {url}")]
    FakeManifest { url: SourceLocator },

    /// The manifest and payload, or the bundle and the store, disagree.
    #[error("{message}: {url}")]
    Inconsistency { message: String, url: SourceLocator },

    /// The bundle cannot be updated without its secret.
    #[error("bundle is read-only: {url}")]
    ReadOnly { url: SourceLocator },

    /// The manifest exceeds the size the store accepts.
    #[error("manifest too big: {url}")]
    ManifestTooBig { url: SourceLocator },

    /// The payload could not be encrypted for its recipient.
    #[error("payload encryption failed: {url}")]
    Encryption { url: SourceLocator },

    /// The payload could not be decrypted with the available keys.
    #[error("payload decryption failed: {url}")]
    Decryption { url: SourceLocator },
}

impl RhizomeError {
    #[must_use]
    pub fn invalid_manifest(url: impl Into<SourceLocator>) -> Self {
        Self::InvalidManifest(InvalidManifestError::new(url))
    }

    #[must_use]
    pub fn inconsistency(message: impl Into<String>, url: impl Into<SourceLocator>) -> Self {
        Self::Inconsistency {
            message: message.into(),
            url: url.into(),
        }
    }

    #[must_use]
    pub fn url(&self) -> &SourceLocator {
        match self {
            Self::InvalidManifest(e) => e.source_location(),
            Self::FakeManifest { url }
            | Self::Inconsistency { url, .. }
            | Self::ReadOnly { url }
            | Self::ManifestTooBig { url }
            | Self::Encryption { url }
            | Self::Decryption { url } => url,
        }
    }

    /// Human-readable description without the locator.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidManifest(e) => e.message(),
            Self::FakeManifest { .. } => FAKE_MANIFEST_MESSAGE,
            Self::Inconsistency { message, .. } => message,
            Self::ReadOnly { .. } => READ_ONLY_MESSAGE,
            Self::ManifestTooBig { .. } => MANIFEST_TOO_BIG_MESSAGE,
            Self::Encryption { .. } => ENCRYPTION_MESSAGE,
            Self::Decryption { .. } => DECRYPTION_MESSAGE,
        }
    }
}

impl Classify for RhizomeError {
    fn class(&self) -> ErrorClass {
        ErrorClass::InvalidContent
    }
}

/// Everything a Rhizome API operation can fail with.
///
/// The two families stay separate so that a `match` must decide what to do
/// with a rejected bundle independently of a broken interface.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RhizomeApiError {
    #[error(transparent)]
    Interface(#[from] InterfaceError),

    #[error(transparent)]
    Rhizome(#[from] RhizomeError),
}

impl RhizomeApiError {
    #[must_use]
    pub fn url(&self) -> &SourceLocator {
        match self {
            Self::Interface(e) => e.url(),
            Self::Rhizome(e) => e.url(),
        }
    }
}

impl From<InvalidManifestError> for RhizomeApiError {
    fn from(e: InvalidManifestError) -> Self {
        Self::Rhizome(RhizomeError::InvalidManifest(e))
    }
}

impl Classify for RhizomeApiError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::Interface(e) => e.class(),
            Self::Rhizome(e) => e.class(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_URL: &str = "https://example.org/manifest";

    #[test]
    fn invalid_manifest_stores_locator_and_fixed_message() {
        let err = InvalidManifestError::new(EXAMPLE_URL);
        assert_eq!(err.message(), "invalid manifest");
        assert_eq!(
            err.source_location().as_str(),
            "https://example.org/manifest"
        );
        assert!(err.cause().is_none());
    }

    #[test]
    fn invalid_manifest_accepts_empty_locator() {
        let err = InvalidManifestError::new("");
        assert!(err.source_location().is_empty());
        assert_eq!(err.message(), INVALID_MANIFEST_MESSAGE);
        assert_eq!(err.to_string(), "invalid manifest: ");
    }

    #[test]
    fn invalid_manifests_with_different_locators_differ() {
        let a = InvalidManifestError::new("http://a/manifest");
        let b = InvalidManifestError::new("http://b/manifest");
        assert_ne!(a.source_location(), b.source_location());
    }

    #[test]
    fn invalid_manifest_display_names_the_locator() {
        let err = InvalidManifestError::new(EXAMPLE_URL);
        assert_eq!(
            err.to_string(),
            "invalid manifest: https://example.org/manifest"
        );
    }

    #[test]
    fn invalid_manifest_chains_its_cause() {
        let parse_err = match "x".parse::<u64>() {
            Ok(v) => panic!("expected parse failure, got {v}"),
            Err(e) => e,
        };
        let err = InvalidManifestError::new(EXAMPLE_URL).with_cause(parse_err);
        assert!(err.cause().is_some());
        let source = err.source().map(ToString::to_string).unwrap_or_default();
        assert!(
            source.contains("invalid digit"),
            "source must be the wrapped error, got {source:?}"
        );
    }

    #[test]
    fn invalid_manifest_is_not_an_interface_error() {
        let boxed: Box<dyn StdError + Send + Sync> =
            Box::new(InvalidManifestError::new(EXAMPLE_URL));
        assert!(boxed.downcast_ref::<InterfaceError>().is_none());
        assert!(boxed.downcast_ref::<InvalidManifestError>().is_some());

        let err = InvalidManifestError::new(EXAMPLE_URL);
        assert_eq!(err.class(), ErrorClass::InvalidContent);
        assert!(!err.is_interface_malfunction());
    }

    #[test]
    fn rhizome_error_accessors_cover_every_variant() {
        let url = SourceLocator::new("http://127.0.0.1:4110/restful/rhizome/insert");
        let cases = [
            (
                RhizomeError::invalid_manifest(url.clone()),
                "invalid manifest",
            ),
            (
                RhizomeError::FakeManifest { url: url.clone() },
                "fake manifest",
            ),
            (
                RhizomeError::inconsistency("payload size mismatch", url.clone()),
                "payload size mismatch",
            ),
            (
                RhizomeError::ReadOnly { url: url.clone() },
                "bundle is read-only",
            ),
            (
                RhizomeError::ManifestTooBig { url: url.clone() },
                "manifest too big",
            ),
            (
                RhizomeError::Encryption { url: url.clone() },
                "payload encryption failed",
            ),
            (
                RhizomeError::Decryption { url: url.clone() },
                "payload decryption failed",
            ),
        ];
        for (err, message) in &cases {
            assert_eq!(err.url(), &url, "url() mismatch for {err:?}");
            assert_eq!(err.message(), *message, "message() mismatch for {err:?}");
            assert!(
                err.to_string().contains(message),
                "Display must include the message for {err:?}"
            );
            assert!(!err.is_interface_malfunction());
        }
    }

    #[test]
    fn api_error_keeps_families_apart() {
        let url = SourceLocator::new("u");
        let interface: RhizomeApiError =
            InterfaceError::MissingContentType { url: url.clone() }.into();
        let rhizome: RhizomeApiError = InvalidManifestError::new(url.clone()).into();

        assert!(interface.is_interface_malfunction());
        assert!(!rhizome.is_interface_malfunction());
        assert!(matches!(
            rhizome,
            RhizomeApiError::Rhizome(RhizomeError::InvalidManifest(_))
        ));
        assert_eq!(interface.url(), &url);
        assert_eq!(rhizome.url(), &url);
    }

    #[test]
    fn api_error_display_is_transparent() {
        let err: RhizomeApiError = RhizomeError::invalid_manifest(EXAMPLE_URL).into();
        assert_eq!(
            err.to_string(),
            "invalid manifest: https://example.org/manifest"
        );
    }

    proptest::proptest! {
        #[test]
        fn proptest_invalid_manifest_preserves_any_locator(
            locator in proptest::prelude::any::<String>(),
        ) {
            let err = InvalidManifestError::new(locator.clone());
            proptest::prop_assert_eq!(err.source_location().as_str(), locator.as_str());
            proptest::prop_assert_eq!(err.message(), INVALID_MANIFEST_MESSAGE);
        }

        #[test]
        fn proptest_distinct_locators_give_distinct_errors(
            a in proptest::prelude::any::<String>(),
            b in proptest::prelude::any::<String>(),
        ) {
            proptest::prop_assume!(a != b);
            let ea = InvalidManifestError::new(a);
            let eb = InvalidManifestError::new(b);
            proptest::prop_assert_ne!(ea.source_location(), eb.source_location());
        }
    }
}
