//! Flat error model for the API client.
//!
//! ERROR HANDLING
//! ==============
//! Every failed action surfaces exactly one user-visible message. The
//! normalizer below reproduces the backend's rejection shapes: a JSON
//! `detail` string, field-specific validation arrays, or an HTML error page
//! from a misconfigured deployment. No retry, no taxonomy beyond the text.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

/// Error produced by [`crate::ShopClient`] operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// An authorized call was attempted without a session. No request is
    /// issued in this case.
    #[error("authentication token missing; log in first")]
    MissingToken,
    /// A management action was attempted on a non-admin session.
    #[error("only admins can {0}")]
    AdminRequired(&'static str),
    /// The request never completed (connection, TLS, timeout).
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The backend rejected the request; `message` is already normalized.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// The backend reported success but the body did not decode.
    #[error("unexpected response body: {0}")]
    Body(#[from] serde_json::Error),
}

/// Normalize a non-success response body into a [`ApiError::Rejected`].
///
/// Resolution order mirrors what the backend actually sends: a string
/// `detail`, then the first entry of a `username`/`password`/`email`
/// validation array, then the per-action fallback. A body that is not JSON
/// at all (typically an HTML error page) maps to a generic status message.
pub(crate) fn rejection(status: u16, body: &str, fallback: &str) -> ApiError {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return ApiError::Rejected {
            status,
            message: format!("request failed with status {status} and a non-JSON body"),
        };
    };

    let message = detail_message(&value)
        .or_else(|| field_message(&value))
        .unwrap_or_else(|| fallback.to_owned());
    ApiError::Rejected { status, message }
}

fn detail_message(value: &Value) -> Option<String> {
    value.get("detail")?.as_str().map(ToOwned::to_owned)
}

fn field_message(value: &Value) -> Option<String> {
    for field in ["username", "password", "email"] {
        let first = value
            .get(field)
            .and_then(Value::as_array)
            .and_then(|messages| messages.first())
            .and_then(Value::as_str);
        if let Some(message) = first {
            return Some(format!("{field} error: {message}"));
        }
    }
    None
}
