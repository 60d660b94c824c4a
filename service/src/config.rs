use std::sync::Arc;

use crate::ServiceError;
use async_trait::async_trait;
use mockall::automock;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub slot_duration_minutes: u16,
    pub google_calendar_id: Option<Arc<str>>,
    pub google_calendar_token: Option<Arc<str>>,
    pub google_calendar_api_url: Arc<str>,
}

#[automock]
#[async_trait]
pub trait ConfigService {
    async fn get_config(&self) -> Result<Config, ServiceError>;
}
