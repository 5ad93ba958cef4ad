//! Run configuration.
//!
//! Settings are read once from environment-style key/value pairs (through the
//! `config` crate) and validated into an immutable [`Settings`] value that is
//! handed to every component. Keys are the lower-cased environment variable
//! names: `PRIMARY_EMAIL` becomes `primary_email`.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use config::{Config, Environment};
use serde::Deserialize;

use crate::error::{GuestSyncError, GuestSyncResult};
use crate::event::CalendarId;
use crate::reconcile::TargetEmails;
use crate::window::{DEFAULT_DAYS_BACK, DEFAULT_DAYS_FORWARD, TimeWindow};

const DEFAULT_PROVIDER_NAME: &str = "calendly";
const DEFAULT_PROVIDER_DOMAIN: &str = "calendly.com";
const DEFAULT_EXCLUDE_SUMMARY_TOKENS: &str = "buffer";

const DEFAULT_TOKEN_FILE: &str = "token.json";
const DEFAULT_OAUTH_CLIENT_FILE: &str = "oauth2_credentials.json";
const DEFAULT_SERVICE_ACCOUNT_FILE: &str = "google-credentials.json";

/// Raw values as they arrive from the environment. Everything is a string so
/// that validation can report the offending variable by name.
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    primary_email: Option<String>,
    secondary_email: Option<String>,
    tertiary_email: Option<String>,
    extra_target_emails: Option<String>,
    days_back: Option<String>,
    days_forward: Option<String>,
    provider_name: Option<String>,
    provider_domain: Option<String>,
    exclude_summary_tokens: Option<String>,
    google_token_file: Option<String>,
    google_oauth_client_file: Option<String>,
    google_credentials_file: Option<String>,
    google_credentials: Option<String>,
    google_oauth_token: Option<String>,
    github_actions: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Calendar to scan and patch
    pub calendar: CalendarId,
    pub targets: TargetEmails,
    pub days_back: u32,
    pub days_forward: u32,
    pub provider: ProviderSettings,
    pub credentials: CredentialSettings,
}

/// Which scheduling service to look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub name: String,
    pub domain: String,
    pub exclude_summary_tokens: Vec<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        ProviderSettings {
            name: DEFAULT_PROVIDER_NAME.to_string(),
            domain: DEFAULT_PROVIDER_DOMAIN.to_string(),
            exclude_summary_tokens: split_list(DEFAULT_EXCLUDE_SUMMARY_TOKENS),
        }
    }
}

/// Where credential material lives. Interpreted by the calendar backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSettings {
    pub token_file: PathBuf,
    pub oauth_client_file: PathBuf,
    pub service_account_file: PathBuf,
    /// Service-account key JSON passed inline
    pub service_account_json: Option<String>,
    /// OAuth token JSON passed inline
    pub oauth_token_json: Option<String>,
    /// Running under CI: refreshed tokens are not written back to disk
    pub ci: bool,
}

impl Default for CredentialSettings {
    fn default() -> Self {
        CredentialSettings {
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            oauth_client_file: PathBuf::from(DEFAULT_OAUTH_CLIENT_FILE),
            service_account_file: PathBuf::from(DEFAULT_SERVICE_ACCOUNT_FILE),
            service_account_json: None,
            oauth_token_json: None,
            ci: false,
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> GuestSyncResult<Self> {
        let config = Config::builder()
            .add_source(Environment::default())
            .build()
            .map_err(|e| GuestSyncError::Config(e.to_string()))?;

        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> GuestSyncResult<Self> {
        let raw: RawSettings = config
            .try_deserialize()
            .map_err(|e| GuestSyncError::Config(e.to_string()))?;

        Self::validate(raw)
    }

    fn validate(raw: RawSettings) -> GuestSyncResult<Self> {
        let calendar = non_blank(raw.primary_email).ok_or_else(|| {
            GuestSyncError::Config("PRIMARY_EMAIL environment variable not set".to_string())
        })?;

        let secondary = non_blank(raw.secondary_email).ok_or_else(|| {
            GuestSyncError::Config("SECONDARY_EMAIL environment variable not set".to_string())
        })?;

        let mut emails = vec![secondary];
        emails.extend(non_blank(raw.tertiary_email));
        if let Some(extra) = raw.extra_target_emails {
            emails.extend(split_list(&extra));
        }
        let targets = TargetEmails::new(emails)?;

        let days_back = parse_days("DAYS_BACK", raw.days_back, DEFAULT_DAYS_BACK)?;
        let days_forward = parse_days("DAYS_FORWARD", raw.days_forward, DEFAULT_DAYS_FORWARD)?;

        let defaults = ProviderSettings::default();
        let provider = ProviderSettings {
            name: non_blank(raw.provider_name).unwrap_or(defaults.name),
            domain: non_blank(raw.provider_domain).unwrap_or(defaults.domain),
            exclude_summary_tokens: raw
                .exclude_summary_tokens
                .map(|tokens| split_list(&tokens))
                .unwrap_or(defaults.exclude_summary_tokens),
        };

        let defaults = CredentialSettings::default();
        let credentials = CredentialSettings {
            token_file: non_blank(raw.google_token_file)
                .map(PathBuf::from)
                .unwrap_or(defaults.token_file),
            oauth_client_file: non_blank(raw.google_oauth_client_file)
                .map(PathBuf::from)
                .unwrap_or(defaults.oauth_client_file),
            service_account_file: non_blank(raw.google_credentials_file)
                .map(PathBuf::from)
                .unwrap_or(defaults.service_account_file),
            service_account_json: non_blank(raw.google_credentials),
            oauth_token_json: non_blank(raw.google_oauth_token),
            ci: non_blank(raw.github_actions).is_some(),
        };

        Ok(Settings {
            calendar: CalendarId::new(calendar),
            targets,
            days_back,
            days_forward,
            provider,
            credentials,
        })
    }

    /// Apply command-line overrides for the scan window.
    pub fn with_window_overrides(mut self, days_back: Option<u32>, days_forward: Option<u32>) -> Self {
        if let Some(days) = days_back {
            self.days_back = days;
        }
        if let Some(days) = days_forward {
            self.days_forward = days;
        }
        self
    }

    pub fn window(&self, now: DateTime<Utc>) -> TimeWindow {
        TimeWindow::around(now, self.days_back, self.days_forward)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_days(name: &str, value: Option<String>, default: u32) -> GuestSyncResult<u32> {
    match non_blank(value) {
        None => Ok(default),
        Some(v) => v.parse::<u32>().map_err(|_| {
            GuestSyncError::Config(format!(
                "{} must be a non-negative whole number of days, got '{}'",
                name, v
            ))
        }),
    }
}
