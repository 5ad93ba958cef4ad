//! Service-account credentials via the OAuth 2.0 JWT bearer grant.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use guestsync_core::service::{Credential, CredentialProvider};
use guestsync_core::{GuestSyncError, GuestSyncResult};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::SCOPES;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a service-account key file that the token exchange needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self> {
        let mut key: ServiceAccountKey =
            serde_json::from_str(json).context("Invalid service-account JSON")?;
        // Keys pasted into CI secrets often carry literal "\n" sequences
        key.private_key = key.private_key.replace("\\n", "\n");
        Ok(key)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read service-account key from {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse service-account key from {}", path.display()))
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: i64,
}

pub struct ServiceAccount {
    key: ServiceAccountKey,
    http: reqwest::Client,
}

impl ServiceAccount {
    pub fn new(key: ServiceAccountKey) -> Self {
        ServiceAccount {
            key,
            http: reqwest::Client::new(),
        }
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Signed RS256 assertion for the token endpoint.
    fn assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SCOPES.join(" "),
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
        };

        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .context("Service-account private key is not a valid RSA PEM key")?;

        encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .context("Failed to sign service-account assertion")
    }

    async fn exchange(&self) -> Result<Credential> {
        let now = Utc::now();
        let assertion = self.assertion(now)?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .context("Failed to send service-account token request")?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Service-account token request rejected: {}", error_text);
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse service-account token response")?;

        Ok(Credential {
            access_token: token.access_token,
            expires_at: (token.expires_in > 0).then(|| now + Duration::seconds(token.expires_in)),
        })
    }
}

#[async_trait]
impl CredentialProvider for ServiceAccount {
    async fn credentials(&self) -> GuestSyncResult<Credential> {
        tracing::info!(account = %self.client_email(), "requesting service-account token");
        self.exchange()
            .await
            .map_err(|e| GuestSyncError::Auth(format!("{:#}", e)))
    }
}
