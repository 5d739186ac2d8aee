//! Rhizome error model for the Serval DNA client.
//!
//! Rhizome operations return [`RhizomeApiError`], which is either an
//! interface malfunction from `servald-core` or a [`RhizomeError`] about
//! the bundle itself. The central case is [`InvalidManifestError`]: the
//! manifest supplied to or received from a Rhizome endpoint failed
//! validation.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod status;

pub use error::{InvalidManifestError, RhizomeApiError, RhizomeError, INVALID_MANIFEST_MESSAGE};
pub use status::{bundle_status, payload_status, BundleStatus, PayloadStatus};
