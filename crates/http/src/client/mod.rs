//! ShlokSagar admin API clients

pub mod admin;
pub mod auth;
pub mod error;
pub mod typed;

pub use error::ClientError;
pub use typed::{AuthenticatedAdminClient, PublicAdminClient, TypedClientBuilder};

use crate::types::ErrorBody;
use reqwest::StatusCode;

/// Default API base used when nothing is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";

/// Build a [`ClientError`] from a non-success response body.
///
/// The backend reports failures as JSON with either a `message` or an `error`
/// field; anything else falls back to the status line.
pub(crate) fn error_from_body(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| format!("API request failed: {status}"));
    ClientError::from_status(status, message)
}
