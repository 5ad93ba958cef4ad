//! OAuth user session: a previously authorized token, refreshed when expired.
//!
//! The token is read either from a JSON file (written back after a refresh
//! unless running in CI) or from an inline JSON string. Both the field names
//! used by Google's client libraries (`token`, `expiry`) and the plain
//! (`access_token`, `expires_at`) spellings are accepted.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use google_calendar::Client;
use guestsync_core::service::{Credential, CredentialProvider};
use guestsync_core::{GuestSyncError, GuestSyncResult};
use serde::{Deserialize, Serialize};

/// Refresh this long before the recorded expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizedUser {
    #[serde(alias = "access_token")]
    pub token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default, alias = "expires_at")]
    pub expiry: Option<DateTime<Utc>>,
    /// Everything else in the file (token_uri, scopes, ...) is kept as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AuthorizedUser {
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => now + Duration::seconds(EXPIRY_MARGIN_SECS) >= expiry,
            None => self.token.is_empty(),
        }
    }
}

/// OAuth client credentials as downloaded from the Google Cloud console.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "OAuth2 client credentials not found at {}\n\
                Download them from https://console.cloud.google.com/apis/credentials",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read OAuth2 client credentials from {}", path.display()))?;

        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse OAuth2 client credentials from {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: ClientSecretsFile = serde_json::from_str(json)?;
        file.installed
            .or(file.web)
            .context("Expected an \"installed\" or \"web\" client section")
    }
}

enum TokenSource {
    File { path: PathBuf, persist: bool },
    Inline(String),
}

pub struct OAuthSession {
    source: TokenSource,
    client_file: PathBuf,
}

impl OAuthSession {
    /// Token stored at `path`; refreshed tokens are saved back when `persist`.
    pub fn from_file(path: impl Into<PathBuf>, client_file: impl Into<PathBuf>, persist: bool) -> Self {
        OAuthSession {
            source: TokenSource::File {
                path: path.into(),
                persist,
            },
            client_file: client_file.into(),
        }
    }

    /// Token JSON passed in directly (e.g. from a CI secret). Never saved.
    pub fn from_json(json: impl Into<String>, client_file: impl Into<PathBuf>) -> Self {
        OAuthSession {
            source: TokenSource::Inline(json.into()),
            client_file: client_file.into(),
        }
    }

    fn load(&self) -> Result<AuthorizedUser> {
        match &self.source {
            TokenSource::File { path, .. } => {
                tracing::info!(path = %path.display(), "loading OAuth token");
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read OAuth token from {}", path.display()))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse OAuth token from {}", path.display()))
            }
            TokenSource::Inline(json) => {
                serde_json::from_str(json).context("Failed to parse inline OAuth token")
            }
        }
    }

    fn save(&self, user: &AuthorizedUser) -> Result<()> {
        let TokenSource::File { path, persist: true } = &self.source else {
            return Ok(());
        };

        let contents = serde_json::to_string_pretty(user).context("Failed to serialize OAuth token")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write OAuth token to {}", path.display()))?;

        // Owner-only, the file holds a refresh token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        tracing::info!(path = %path.display(), "saved refreshed OAuth token");
        Ok(())
    }

    fn client_secrets(&self, user: &AuthorizedUser) -> Result<ClientSecrets> {
        match (&user.client_id, &user.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Ok(ClientSecrets {
                client_id: id.clone(),
                client_secret: secret.clone(),
            }),
            _ => ClientSecrets::load(&self.client_file),
        }
    }

    async fn refresh(&self, user: &AuthorizedUser) -> Result<AuthorizedUser> {
        if user.refresh_token.is_empty() {
            anyhow::bail!("OAuth token expired and has no refresh token; authorize again");
        }

        let secrets = self.client_secrets(user)?;
        let client = Client::new(
            secrets.client_id,
            secrets.client_secret,
            String::new(),
            user.token.clone(),
            user.refresh_token.clone(),
        );

        let access_token = client
            .refresh_access_token()
            .await
            .context("Failed to refresh token")?;

        let mut refreshed = user.clone();
        refreshed.token = access_token.access_token;
        // Google typically doesn't return a new refresh_token on refresh
        if !access_token.refresh_token.is_empty() {
            refreshed.refresh_token = access_token.refresh_token;
        }
        refreshed.expiry = if access_token.expires_in > 0 {
            Some(Utc::now() + Duration::seconds(access_token.expires_in))
        } else {
            None
        };

        Ok(refreshed)
    }

    /// Load the token and refresh it if it is about to expire.
    pub async fn load_valid(&self) -> Result<AuthorizedUser> {
        let user = self.load()?;

        if !user.needs_refresh(Utc::now()) {
            return Ok(user);
        }

        tracing::info!("refreshing expired OAuth token");
        let refreshed = self.refresh(&user).await?;
        self.save(&refreshed)?;
        Ok(refreshed)
    }
}

#[async_trait]
impl CredentialProvider for OAuthSession {
    async fn credentials(&self) -> GuestSyncResult<Credential> {
        let user = self
            .load_valid()
            .await
            .map_err(|e| GuestSyncError::Auth(format!("{:#}", e)))?;

        Ok(Credential {
            access_token: user.token,
            expires_at: user.expiry,
        })
    }
}
