//! External identity provider client.
//!
//! Authentication is delegated entirely to a hosted identity service
//! speaking a REST token API. The storefront never stores credentials:
//! it exchanges an email/password pair (or a federated ID token) for a
//! provider identity, then mirrors that identity into a local account
//! row keyed by the provider's stable uid.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::IdentityConfig;

mod error;

pub use error::IdentityError;

/// A verified identity returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderIdentity {
    /// Stable provider-assigned user id.
    #[serde(rename = "localId")]
    pub uid: String,
    /// Verified email address.
    pub email: String,
    /// Display name, when the provider has one.
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    /// Profile photo URL, when the provider has one.
    #[serde(rename = "photoUrl", default)]
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(rename = "returnSecureToken")]
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    #[serde(rename = "idToken")]
    id_token: &'a str,
    #[serde(rename = "returnSecureToken")]
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Identity provider API client.
#[derive(Clone)]
pub struct IdentityClient {
    client: reqwest::Client,
    base_url: Url,
}

impl IdentityClient {
    /// Create a new identity API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let mut headers = HeaderMap::new();

        let key_value = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| IdentityError::Decode(format!("invalid API key format: {e}")))?;
        headers.insert("X-Api-Key", key_value);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Provider` with the provider's error code
    /// (e.g. `INVALID_PASSWORD`, `EMAIL_NOT_FOUND`) when credentials are
    /// rejected.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderIdentity, IdentityError> {
        self.post(
            "accounts:signInWithPassword",
            &PasswordRequest {
                email,
                password,
                return_secure_token: true,
            },
        )
        .await
    }

    /// Register a new account with email and password.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Provider` with codes like `EMAIL_EXISTS`
    /// or `WEAK_PASSWORD` when the provider rejects the registration.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderIdentity, IdentityError> {
        self.post(
            "accounts:signUp",
            &PasswordRequest {
                email,
                password,
                return_secure_token: true,
            },
        )
        .await
    }

    /// Sign in with a federated ID token obtained client-side.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Provider` when the token is invalid or
    /// expired.
    pub async fn token_sign_in(&self, id_token: &str) -> Result<ProviderIdentity, IdentityError> {
        self.post(
            "accounts:lookup",
            &TokenRequest {
                id_token,
                return_secure_token: true,
            },
        )
        .await
    }

    async fn post<B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<ProviderIdentity, IdentityError> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| IdentityError::Decode(format!("invalid endpoint URL: {e}")))?;

        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<ErrorEnvelope>().await {
                Ok(envelope) => envelope.error.message,
                Err(_) => String::from("UNKNOWN_ERROR"),
            };
            return Err(IdentityError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| IdentityError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_identity_decodes_minimal_payload() {
        let identity: ProviderIdentity =
            serde_json::from_str(r#"{"localId":"uid-1","email":"a@b.com"}"#).unwrap();
        assert_eq!(identity.uid, "uid-1");
        assert_eq!(identity.email, "a@b.com");
        assert!(identity.display_name.is_none());
        assert!(identity.photo_url.is_none());
    }

    #[test]
    fn provider_identity_decodes_full_payload() {
        let identity: ProviderIdentity = serde_json::from_str(
            r#"{"localId":"uid-2","email":"a@b.com","displayName":"Ada","photoUrl":"https://img.example/p.png"}"#,
        )
        .unwrap();
        assert_eq!(identity.display_name.as_deref(), Some("Ada"));
        assert_eq!(
            identity.photo_url.as_deref(),
            Some("https://img.example/p.png")
        );
    }

    #[test]
    fn error_envelope_extracts_provider_code() {
        let envelope: ErrorEnvelope =
            serde_json::from_str(r#"{"error":{"code":400,"message":"EMAIL_EXISTS"}}"#).unwrap();
        assert_eq!(envelope.error.message, "EMAIL_EXISTS");
    }
}
