use std::{env, sync::Arc};

use async_trait::async_trait;
use service::{
    config::{Config, ConfigService},
    ServiceError,
};
use tracing::warn;

pub const DEFAULT_SLOT_DURATION_MINUTES: u16 = 30;
pub const DEFAULT_GOOGLE_CALENDAR_API_URL: &str = "https://www.googleapis.com/calendar/v3";

pub struct ConfigServiceImpl;

fn optional_var(name: &str) -> Option<Arc<str>> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(Arc::from)
}

fn slot_duration_minutes() -> u16 {
    match env::var("SLOT_DURATION_MINUTES") {
        Ok(value) => match value.trim().parse::<u16>() {
            Ok(minutes) if minutes > 0 => minutes,
            _ => {
                warn!(
                    "Invalid SLOT_DURATION_MINUTES '{}', using {}",
                    value, DEFAULT_SLOT_DURATION_MINUTES
                );
                DEFAULT_SLOT_DURATION_MINUTES
            }
        },
        Err(_) => DEFAULT_SLOT_DURATION_MINUTES,
    }
}

#[async_trait]
impl ConfigService for ConfigServiceImpl {
    async fn get_config(&self) -> Result<Config, ServiceError> {
        Ok(Config {
            slot_duration_minutes: slot_duration_minutes(),
            google_calendar_id: optional_var("GOOGLE_CALENDAR_ID"),
            google_calendar_token: optional_var("GOOGLE_CALENDAR_TOKEN"),
            google_calendar_api_url: optional_var("GOOGLE_CALENDAR_API_URL")
                .unwrap_or_else(|| Arc::from(DEFAULT_GOOGLE_CALENDAR_API_URL)),
        })
    }
}
