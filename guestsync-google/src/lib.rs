//! Google Calendar backend for guestsync.
//!
//! - `calendar`: `CalendarService` over the Calendar v3 API
//! - `session`: OAuth user token, refreshed when expired
//! - `service_account`: service-account key exchanged for a token
//!
//! [`credential_provider`] picks the credential source from settings.

pub mod calendar;
pub mod convert;
pub mod service_account;
pub mod session;

use guestsync_core::service::CredentialProvider;
use guestsync_core::settings::CredentialSettings;
use guestsync_core::{GuestSyncError, GuestSyncResult};

pub use calendar::GoogleCalendar;
pub use service_account::{ServiceAccount, ServiceAccountKey};
pub use session::OAuthSession;

pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar"];

/// Choose a credential source, first match wins:
/// 1. service-account key file
/// 2. service-account key JSON passed inline
/// 3. OAuth token JSON passed inline
/// 4. OAuth token file
pub fn credential_provider(
    settings: &CredentialSettings,
) -> GuestSyncResult<Box<dyn CredentialProvider>> {
    let key_file = &settings.service_account_file;
    if key_file.exists() {
        match ServiceAccountKey::load(key_file) {
            Ok(key) => {
                tracing::info!(path = %key_file.display(), "using service-account key file");
                return Ok(Box::new(ServiceAccount::new(key)));
            }
            Err(err) => {
                tracing::warn!(error = %format!("{:#}", err), "ignoring unreadable service-account key file");
            }
        }
    }

    if let Some(json) = &settings.service_account_json {
        tracing::info!("using service-account key from GOOGLE_CREDENTIALS");
        let key = ServiceAccountKey::from_json(json)
            .map_err(|e| GuestSyncError::Auth(format!("GOOGLE_CREDENTIALS: {:#}", e)))?;
        return Ok(Box::new(ServiceAccount::new(key)));
    }

    if let Some(json) = &settings.oauth_token_json {
        tracing::info!("using OAuth token from GOOGLE_OAUTH_TOKEN");
        return Ok(Box::new(OAuthSession::from_json(
            json.clone(),
            settings.oauth_client_file.clone(),
        )));
    }

    if settings.token_file.exists() {
        return Ok(Box::new(OAuthSession::from_file(
            settings.token_file.clone(),
            settings.oauth_client_file.clone(),
            !settings.ci,
        )));
    }

    Err(GuestSyncError::Auth(format!(
        "Google credentials not found. Provide one of:\n\
        1. a service-account key at {} (or GOOGLE_CREDENTIALS_FILE)\n\
        2. the service-account key JSON in GOOGLE_CREDENTIALS\n\
        3. an authorized OAuth token JSON in GOOGLE_OAUTH_TOKEN\n\
        4. an authorized OAuth token at {} (or GOOGLE_TOKEN_FILE)",
        settings.service_account_file.display(),
        settings.token_file.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_in(dir: &std::path::Path) -> CredentialSettings {
        CredentialSettings {
            token_file: dir.join("token.json"),
            oauth_client_file: dir.join("oauth2_credentials.json"),
            service_account_file: dir.join("google-credentials.json"),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_credentials_is_an_auth_error() {
        let dir = tempfile::tempdir().unwrap();
        match credential_provider(&settings_in(dir.path())) {
            Err(GuestSyncError::Auth(msg)) => assert!(msg.contains("GOOGLE_CREDENTIALS")),
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn test_invalid_inline_service_account_is_an_auth_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings_in(dir.path());
        settings.service_account_json = Some("{not json".to_string());
        assert!(matches!(
            credential_provider(&settings),
            Err(GuestSyncError::Auth(_))
        ));
    }

    #[test]
    fn test_token_file_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        std::fs::write(&settings.token_file, r#"{"token": "t"}"#).unwrap();
        assert!(credential_provider(&settings).is_ok());
    }

    #[test]
    fn test_unreadable_key_file_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings_in(dir.path());
        std::fs::write(&settings.service_account_file, "garbage").unwrap();
        settings.oauth_token_json = Some(r#"{"token": "t"}"#.to_string());
        assert!(credential_provider(&settings).is_ok());
    }
}
