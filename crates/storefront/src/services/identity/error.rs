//! Identity provider error types.

use thiserror::Error;

/// Errors from the external identity provider.
///
/// `Provider` carries the provider's own error code verbatim so the
/// client can distinguish cases like `EMAIL_EXISTS` from
/// `INVALID_PASSWORD`. Everything else is transport or decoding
/// failure on our side.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider rejected the request.
    #[error("identity provider error: {status} - {message}")]
    Provider { status: u16, message: String },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to decode the provider's response.
    #[error("decode error: {0}")]
    Decode(String),
}
