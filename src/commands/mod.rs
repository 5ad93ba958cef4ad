pub mod calendars;
pub mod sync;

use anyhow::Result;
use guestsync_core::settings::CredentialSettings;
use guestsync_google::GoogleCalendar;

/// Resolve credentials and build an authorized calendar client.
pub async fn connect(credentials: &CredentialSettings) -> Result<GoogleCalendar> {
    let provider = guestsync_google::credential_provider(credentials)?;
    let credential = provider.credentials().await?;
    GoogleCalendar::new(&credential)
}
