//! Failures surfaced by the rate client.

use reqwest::StatusCode;

/// Error returned by every [`Client`](crate::Client) operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The service answered with a status other than 200. The raw response
    /// body is carried for diagnostics.
    #[error("rate request failed with status {status}: {body}")]
    RequestFailed { status: StatusCode, body: String },

    /// DNS, connect, send or body-read failure before a usable response
    /// was obtained.
    #[error("transport error during rate request")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected JSON shape.
    #[error("failed to decode rates response")]
    Decode(#[from] serde_json::Error),
}
