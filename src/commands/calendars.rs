use anyhow::Result;
use guestsync_core::service::CalendarService;
use guestsync_core::settings::Settings;

use crate::render;

pub async fn run() -> Result<()> {
    let settings = Settings::from_env()?;
    let calendar = super::connect(&settings.credentials).await?;

    let calendars = calendar.list_calendars().await?;
    println!("{}", render::calendar_list(&calendars));

    Ok(())
}
