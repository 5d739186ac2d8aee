//! Bundle and payload status codes reported by the daemon, and the errors
//! they turn into.

use std::fmt;

use serde::{Deserialize, Serialize};
use servald_core::{InterfaceError, RestfulResponse, SourceLocator};

use crate::{InvalidManifestError, RhizomeApiError, RhizomeError};

/// JSON field names carrying the status of a Rhizome operation.
pub const BUNDLE_STATUS_CODE: &str = "rhizome_bundle_status_code";
pub const BUNDLE_STATUS_MESSAGE: &str = "rhizome_bundle_status_message";
pub const PAYLOAD_STATUS_CODE: &str = "rhizome_payload_status_code";
pub const PAYLOAD_STATUS_MESSAGE: &str = "rhizome_payload_status_message";

/// Outcome of storing or looking up a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum BundleStatus {
    /// The daemon failed internally.
    Error,
    /// Bundle was stored.
    New,
    /// The identical bundle is already in the store.
    Same,
    /// An equivalent bundle with a different id is already in the store.
    Duplicate,
    /// A newer version of the bundle is already in the store.
    Old,
    /// The manifest is invalid.
    Invalid,
    /// The manifest signature does not verify.
    Fake,
    /// Manifest and payload disagree.
    Inconsistent,
    /// Not enough space in the store.
    NoRoom,
    /// No secret available to update the bundle.
    #[serde(rename = "READONLY")]
    ReadOnly,
    /// The store is locked by another operation.
    Busy,
    /// The manifest is too large to store.
    ManifestTooBig,
}

impl BundleStatus {
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            -1 => Self::Error,
            0 => Self::New,
            1 => Self::Same,
            2 => Self::Duplicate,
            3 => Self::Old,
            4 => Self::Invalid,
            5 => Self::Fake,
            6 => Self::Inconsistent,
            7 => Self::NoRoom,
            8 => Self::ReadOnly,
            9 => Self::Busy,
            10 => Self::ManifestTooBig,
            _ => return None,
        })
    }

    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Error => -1,
            Self::New => 0,
            Self::Same => 1,
            Self::Duplicate => 2,
            Self::Old => 3,
            Self::Invalid => 4,
            Self::Fake => 5,
            Self::Inconsistent => 6,
            Self::NoRoom => 7,
            Self::ReadOnly => 8,
            Self::Busy => 9,
            Self::ManifestTooBig => 10,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::New => "NEW",
            Self::Same => "SAME",
            Self::Duplicate => "DUPLICATE",
            Self::Old => "OLD",
            Self::Invalid => "INVALID",
            Self::Fake => "FAKE",
            Self::Inconsistent => "INCONSISTENT",
            Self::NoRoom => "NO_ROOM",
            Self::ReadOnly => "READONLY",
            Self::Busy => "BUSY",
            Self::ManifestTooBig => "MANIFEST_TOO_BIG",
        }
    }

    /// Turn a status the daemon reported for `url` into an error where the
    /// status means the bundle was rejected.
    ///
    /// `NEW`, `SAME`, `DUPLICATE`, `OLD`, `NO_ROOM` and `BUSY` are returned
    /// unchanged for the caller to act on.
    ///
    /// # Errors
    /// - [`InterfaceError::DaemonFailure`] for `ERROR`
    /// - [`RhizomeError::InvalidManifest`] for `INVALID`
    /// - [`RhizomeError::FakeManifest`] for `FAKE`
    /// - [`RhizomeError::Inconsistency`] for `INCONSISTENT`
    /// - [`RhizomeError::ReadOnly`] for `READONLY`
    /// - [`RhizomeError::ManifestTooBig`] for `MANIFEST_TOO_BIG`
    pub fn check(
        self,
        url: &SourceLocator,
        message: Option<&str>,
    ) -> Result<Self, RhizomeApiError> {
        let url = url.clone();
        let err: RhizomeApiError = match self {
            Self::New | Self::Same | Self::Duplicate | Self::Old | Self::NoRoom | Self::Busy => {
                return Ok(self);
            }
            Self::Error => InterfaceError::DaemonFailure {
                message: failure_message(BUNDLE_STATUS_CODE, self, self.code(), message),
                url,
            }
            .into(),
            Self::Invalid => InvalidManifestError::new(url).into(),
            Self::Fake => RhizomeError::FakeManifest { url }.into(),
            Self::Inconsistent => {
                RhizomeError::inconsistency(message.unwrap_or("inconsistent bundle"), url).into()
            }
            Self::ReadOnly => RhizomeError::ReadOnly { url }.into(),
            Self::ManifestTooBig => RhizomeError::ManifestTooBig { url }.into(),
        };
        tracing::warn!(
            url = %err.url(),
            code = self.code(),
            status = %self,
            error = %err,
            "bundle rejected"
        );
        Err(err)
    }
}

impl fmt::Display for BundleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of storing or reading a bundle's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum PayloadStatus {
    /// The daemon failed internally.
    Error,
    /// The payload has zero length.
    Empty,
    /// Payload was stored.
    New,
    /// The payload is already in the store.
    Stored,
    /// Payload length does not match the manifest.
    WrongSize,
    /// Payload hash does not match the manifest.
    WrongHash,
    /// Payload could not be encrypted or decrypted.
    CryptoFail,
    /// Payload is larger than the store.
    TooBig,
    /// Payload was evicted to make room.
    Evicted,
}

impl PayloadStatus {
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            -1 => Self::Error,
            0 => Self::Empty,
            1 => Self::New,
            2 => Self::Stored,
            3 => Self::WrongSize,
            4 => Self::WrongHash,
            5 => Self::CryptoFail,
            6 => Self::TooBig,
            7 => Self::Evicted,
            _ => return None,
        })
    }

    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Error => -1,
            Self::Empty => 0,
            Self::New => 1,
            Self::Stored => 2,
            Self::WrongSize => 3,
            Self::WrongHash => 4,
            Self::CryptoFail => 5,
            Self::TooBig => 6,
            Self::Evicted => 7,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Empty => "EMPTY",
            Self::New => "NEW",
            Self::Stored => "STORED",
            Self::WrongSize => "WRONG_SIZE",
            Self::WrongHash => "WRONG_HASH",
            Self::CryptoFail => "CRYPTO_FAIL",
            Self::TooBig => "TOO_BIG",
            Self::Evicted => "EVICTED",
        }
    }

    /// Turn a payload status into an error where it means the payload was
    /// rejected. `EMPTY`, `NEW`, `STORED`, `TOO_BIG` and `EVICTED` pass
    /// through.
    ///
    /// # Errors
    /// - [`InterfaceError::DaemonFailure`] for `ERROR`
    /// - [`RhizomeError::Inconsistency`] for `WRONG_SIZE` and `WRONG_HASH`
    /// - [`RhizomeError::Encryption`] for `CRYPTO_FAIL`
    pub fn check(
        self,
        url: &SourceLocator,
        message: Option<&str>,
    ) -> Result<Self, RhizomeApiError> {
        let url = url.clone();
        let err: RhizomeApiError = match self {
            Self::Empty | Self::New | Self::Stored | Self::TooBig | Self::Evicted => {
                return Ok(self);
            }
            Self::Error => InterfaceError::DaemonFailure {
                message: failure_message(PAYLOAD_STATUS_CODE, self, self.code(), message),
                url,
            }
            .into(),
            Self::WrongSize => RhizomeError::inconsistency(
                message.unwrap_or("payload size does not match manifest"),
                url,
            )
            .into(),
            Self::WrongHash => RhizomeError::inconsistency(
                message.unwrap_or("payload hash does not match manifest"),
                url,
            )
            .into(),
            Self::CryptoFail => RhizomeError::Encryption { url }.into(),
        };
        tracing::warn!(
            url = %err.url(),
            code = self.code(),
            status = %self,
            error = %err,
            "payload rejected"
        );
        Err(err)
    }
}

impl fmt::Display for PayloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read and check the bundle status of a Rhizome response.
///
/// # Errors
/// Returns [`InterfaceError::InvalidJson`] if the status code is missing,
/// not an integer, or unknown; otherwise whatever [`BundleStatus::check`]
/// returns.
pub fn bundle_status(response: &RestfulResponse) -> Result<BundleStatus, RhizomeApiError> {
    let code = response.field_i64(BUNDLE_STATUS_CODE)?;
    let message = response.optional_str(BUNDLE_STATUS_MESSAGE)?;
    let status = BundleStatus::from_code(code)
        .ok_or_else(|| response.invalid(format!("unrecognised {BUNDLE_STATUS_CODE}={code}")))?;
    tracing::debug!(url = %response.url(), %status, "bundle status");
    status.check(response.url(), message)
}

/// Read and check the payload status of a Rhizome response.
///
/// # Errors
/// Returns [`InterfaceError::InvalidJson`] if the status code is missing,
/// not an integer, or unknown; otherwise whatever [`PayloadStatus::check`]
/// returns.
pub fn payload_status(response: &RestfulResponse) -> Result<PayloadStatus, RhizomeApiError> {
    let code = response.field_i64(PAYLOAD_STATUS_CODE)?;
    let message = response.optional_str(PAYLOAD_STATUS_MESSAGE)?;
    let status = PayloadStatus::from_code(code)
        .ok_or_else(|| response.invalid(format!("unrecognised {PAYLOAD_STATUS_CODE}={code}")))?;
    tracing::debug!(url = %response.url(), %status, "payload status");
    status.check(response.url(), message)
}

fn failure_message(
    field: &str,
    status: impl fmt::Display,
    code: i64,
    message: Option<&str>,
) -> String {
    match message {
        Some(m) => format!("received {field}={status}({code}): {m}"),
        None => format!("received {field}={status}({code})"),
    }
}
