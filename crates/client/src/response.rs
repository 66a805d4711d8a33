//! Raw HTTP response paired with its decoded record.

use std::borrow::Cow;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use sparkrest_core::submission::ErrorResponse;

use crate::error::ClientError;

/// Outcome of one round trip to the Spark master.
///
/// `result` is `Some` only when the status is in `[200, 300)`. Any other
/// status leaves it `None` whatever the body holds, so callers check
/// [`status`](Self::status) or the `result` itself.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Response body exactly as received.
    pub body: Vec<u8>,
    pub result: Option<T>,
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Build a response, decoding `body` into `T` when `status` is 2xx.
    ///
    /// The body is read as strict UTF-8 JSON; a malformed or non-UTF-8
    /// body on a 2xx status is a [`ClientError::Decode`].
    pub fn decode(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Result<Self, ClientError> {
        let result = if status.is_success() {
            Some(serde_json::from_slice::<T>(&body)?)
        } else {
            None
        };

        Ok(Self {
            status,
            headers,
            body,
            result,
        })
    }
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// Body as text, with invalid UTF-8 replaced. For display only.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// The master's `ErrorResponse` for a rejected request, if the body holds one.
    ///
    /// Always `None` on 2xx responses and on bodies that are not JSON.
    pub fn error_response(&self) -> Option<ErrorResponse> {
        if self.is_success() {
            return None;
        }
        serde_json::from_slice(&self.body).ok()
    }

    /// Collapse into the decoded record, or [`ClientError::Status`] for a non-2xx reply.
    pub fn into_result(self) -> Result<T, ClientError> {
        match self.result {
            Some(result) => Ok(result),
            None => Err(ClientError::Status {
                status: self.status.as_u16(),
                body: String::from_utf8_lossy(&self.body).into_owned(),
            }),
        }
    }
}
