use anyhow::Result;
use chrono::Utc;
use guestsync_core::service::CalendarService;
use guestsync_core::settings::Settings;
use guestsync_core::sync::SyncRun;

use crate::render;

pub async fn run(days_back: Option<u32>, days_forward: Option<u32>) -> Result<()> {
    let settings = Settings::from_env()?.with_window_overrides(days_back, days_forward);
    let calendar = super::connect(&settings.credentials).await?;

    // Only a diagnostic; the calendar may still be reachable by id
    match calendar.list_calendars().await {
        Ok(calendars) => println!("{}", render::calendar_list(&calendars)),
        Err(err) => tracing::warn!(error = %err, "could not list calendars"),
    }

    println!("Syncing guests on calendar {}", settings.calendar);
    let summary = SyncRun::new(&calendar, &settings).run(Utc::now()).await;
    println!("{}", render::run_summary(&summary, &settings.provider.name));

    Ok(())
}
