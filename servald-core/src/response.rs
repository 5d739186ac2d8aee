//! Validation of raw REST responses into JSON documents.
//!
//! The transport is an external collaborator: it hands over the status
//! code, the `Content-Type` header and the body, and this module decides
//! whether that is a usable JSON response or an [`InterfaceError`].

use serde_json::Value;

use crate::{InterfaceError, SourceLocator};

const JSON_MEDIA_TYPE: &str = "application/json";

/// A REST response whose body has been parsed as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct RestfulResponse {
    url: SourceLocator,
    status: u16,
    json: Value,
}

impl RestfulResponse {
    /// Check the content type and parse the body.
    ///
    /// Media-type parameters such as `; charset=utf-8` are ignored.
    ///
    /// # Errors
    /// - [`InterfaceError::MissingContentType`] if `content_type` is `None`
    /// - [`InterfaceError::InvalidContentType`] if it is not `application/json`
    /// - [`InterfaceError::MalformedJson`] if the body does not parse
    pub fn from_parts(
        url: SourceLocator,
        status: u16,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<Self, InterfaceError> {
        let Some(content_type) = content_type else {
            tracing::warn!(url = %url, status, "response has no content type");
            return Err(InterfaceError::MissingContentType { url });
        };

        let mime_type = media_type(content_type);
        if !mime_type.eq_ignore_ascii_case(JSON_MEDIA_TYPE) {
            tracing::warn!(url = %url, status, mime_type, "response is not JSON");
            return Err(InterfaceError::InvalidContentType {
                mime_type: mime_type.to_owned(),
                url,
            });
        }

        let json = match serde_json::from_slice(body) {
            Ok(json) => json,
            Err(source) => {
                tracing::warn!(
                    url = %url,
                    status,
                    error = %source,
                    "malformed JSON response"
                );
                return Err(InterfaceError::MalformedJson { url, source });
            }
        };

        Ok(Self { url, status, json })
    }

    /// Reject the response unless its status is one of `accepted`.
    ///
    /// # Errors
    /// Returns [`InterfaceError::RequestFailed`] for any other status.
    pub fn require_status(self, accepted: &[u16]) -> Result<Self, InterfaceError> {
        if accepted.contains(&self.status) {
            return Ok(self);
        }
        tracing::debug!(
            url = %self.url,
            status = self.status,
            ?accepted,
            "unexpected HTTP status"
        );
        Err(InterfaceError::RequestFailed {
            status: self.status,
            url: self.url,
        })
    }

    #[must_use]
    pub fn url(&self) -> &SourceLocator {
        &self.url
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn json(&self) -> &Value {
        &self.json
    }

    /// Integer field of the top-level JSON object.
    ///
    /// # Errors
    /// Returns [`InterfaceError::InvalidJson`] if the field is missing or
    /// not an integer.
    pub fn field_i64(&self, name: &str) -> Result<i64, InterfaceError> {
        match self.json.get(name) {
            Some(value) => value
                .as_i64()
                .ok_or_else(|| self.invalid(format!("field {name:?} is not an integer"))),
            None => Err(self.invalid(format!("missing field {name:?}"))),
        }
    }

    /// String field of the top-level JSON object.
    ///
    /// # Errors
    /// Returns [`InterfaceError::InvalidJson`] if the field is missing or
    /// not a string.
    pub fn field_str(&self, name: &str) -> Result<&str, InterfaceError> {
        match self.json.get(name) {
            Some(value) => value
                .as_str()
                .ok_or_else(|| self.invalid(format!("field {name:?} is not a string"))),
            None => Err(self.invalid(format!("missing field {name:?}"))),
        }
    }

    /// String field that may be absent or `null`.
    ///
    /// # Errors
    /// Returns [`InterfaceError::InvalidJson`] if the field is present but
    /// not a string.
    pub fn optional_str(&self, name: &str) -> Result<Option<&str>, InterfaceError> {
        match self.json.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| self.invalid(format!("field {name:?} is not a string"))),
        }
    }

    /// An [`InterfaceError::InvalidJson`] for this response.
    #[must_use]
    pub fn invalid(&self, reason: impl Into<String>) -> InterfaceError {
        InterfaceError::InvalidJson {
            reason: reason.into(),
            url: self.url.clone(),
        }
    }
}

fn media_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or_default().trim()
}
