use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use service::{
    calendar::{event_description, event_summary, CalendarEvent, CalendarService},
    config::Config,
    employee::Employee,
    shift::Shift,
    ServiceError,
};
use time::macros::format_description;
use shopshift_utils::StoreWeek;
use time::{Duration, PrimitiveDateTime};
use tracing::{info, instrument, warn};

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct EventTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone")]
    pub time_zone: &'static str,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct EventBody {
    pub summary: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
}

#[derive(Debug, Deserialize)]
struct EventResponse {
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventTimeResponse {
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
    pub date: Option<String>,
}
impl EventTimeResponse {
    fn into_value(self) -> Option<Arc<str>> {
        self.date_time.or(self.date).map(Arc::from)
    }
}

#[derive(Debug, Deserialize)]
pub struct EventListItem {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: Option<EventTimeResponse>,
    pub end: Option<EventTimeResponse>,
}
impl From<EventListItem> for CalendarEvent {
    fn from(item: EventListItem) -> Self {
        Self {
            id: item.id.into(),
            summary: item.summary.map(Arc::from),
            description: item.description.map(Arc::from),
            start: item.start.and_then(EventTimeResponse::into_value),
            end: item.end.and_then(EventTimeResponse::into_value),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EventListResponse {
    #[serde(default)]
    pub items: Vec<EventListItem>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarListEntry {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct CalendarListResponse {
    pub items: Option<Vec<CalendarListEntry>>,
}
impl CalendarListResponse {
    pub fn contains(&self, calendar_id: &str) -> bool {
        self.items
            .iter()
            .flatten()
            .any(|entry| entry.id == calendar_id)
    }
}

fn sync_failed(err: impl std::fmt::Display) -> ServiceError {
    ServiceError::CalendarSyncFailed(err.to_string().into())
}

fn event_time(date: time::Date, time: time::Time) -> Result<EventTime, ServiceError> {
    let date_time = PrimitiveDateTime::new(date, time)
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second]"
        ))
        .map_err(sync_failed)?;
    Ok(EventTime {
        date_time,
        time_zone: "UTC",
    })
}

pub fn event_body(shift: &Shift, employee: &Employee) -> Result<EventBody, ServiceError> {
    Ok(EventBody {
        summary: event_summary(employee),
        description: event_description(shift, employee),
        start: event_time(shift.date, shift.start_time)?,
        end: event_time(shift.date, shift.end_time)?,
    })
}

/// `{api}/calendars/{calendar_id}/events[/{event_id}]` with every segment
/// percent encoded.
pub fn events_url(
    api_url: &str,
    calendar_id: &str,
    event_id: Option<&str>,
) -> Result<Url, ServiceError> {
    let mut url = Url::parse(api_url).map_err(sync_failed)?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| sync_failed(format!("Invalid calendar api url {api_url}")))?;
        segments.pop_if_empty().extend(["calendars", calendar_id, "events"]);
        if let Some(event_id) = event_id {
            segments.push(event_id);
        }
    }
    Ok(url)
}

/// Create for a new event, update when the shift already has one.
pub fn sync_target(
    api_url: &str,
    calendar_id: &str,
    event_id: Option<&str>,
) -> Result<(Method, Url), ServiceError> {
    let method = match event_id {
        Some(_) => Method::PUT,
        None => Method::POST,
    };
    Ok((method, events_url(api_url, calendar_id, event_id)?))
}

/// Event listing for one week. `timeMax` is exclusive, so it points at the
/// following Monday.
pub fn week_events_url(
    api_url: &str,
    calendar_id: &str,
    week: StoreWeek,
) -> Result<Url, ServiceError> {
    let day_start = format_description!("[year]-[month]-[day]T00:00:00Z");
    let time_min = week.start.format(day_start).map_err(sync_failed)?;
    let time_max = (week.end + Duration::days(1))
        .format(day_start)
        .map_err(sync_failed)?;
    let mut url = events_url(api_url, calendar_id, None)?;
    url.query_pairs_mut()
        .append_pair("timeMin", &time_min)
        .append_pair("timeMax", &time_max)
        .append_pair("singleEvents", "true")
        .append_pair("orderBy", "startTime");
    Ok(url)
}

/// `{api}/users/me/calendarList`
pub fn calendar_list_url(api_url: &str) -> Result<Url, ServiceError> {
    let mut url = Url::parse(api_url).map_err(sync_failed)?;
    url.path_segments_mut()
        .map_err(|_| sync_failed(format!("Invalid calendar api url {api_url}")))?
        .pop_if_empty()
        .extend(["users", "me", "calendarList"]);
    Ok(url)
}

/// Google Calendar v3 client. Every call is a no-op when no calendar id is
/// configured.
pub struct CalendarServiceImpl<ConfigService>
where
    ConfigService: service::config::ConfigService + Send + Sync,
{
    config_service: Arc<ConfigService>,
    client: Client,
}
impl<ConfigService> CalendarServiceImpl<ConfigService>
where
    ConfigService: service::config::ConfigService + Send + Sync,
{
    pub fn new(config_service: Arc<ConfigService>) -> Self {
        Self {
            config_service,
            client: Client::new(),
        }
    }

    fn request(
        &self,
        method: Method,
        url: Url,
        config: &Config,
    ) -> reqwest::RequestBuilder {
        let request = self.client.request(method, url);
        match &config.google_calendar_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        config: &Config,
    ) -> Result<T, ServiceError> {
        self.request(Method::GET, url, config)
            .send()
            .await
            .map_err(sync_failed)?
            .error_for_status()
            .map_err(sync_failed)?
            .json::<T>()
            .await
            .map_err(sync_failed)
    }
}

#[async_trait]
impl<ConfigService> CalendarService for CalendarServiceImpl<ConfigService>
where
    ConfigService: service::config::ConfigService + Send + Sync,
{
    #[instrument(skip(self, shift, employee), fields(shift_id = %shift.id))]
    async fn sync_shift(
        &self,
        shift: &Shift,
        employee: &Employee,
    ) -> Result<Option<Arc<str>>, ServiceError> {
        let config = self.config_service.get_config().await?;
        let Some(calendar_id) = config.google_calendar_id.clone() else {
            info!("No calendar configured, skipping sync");
            return Ok(None);
        };
        let body = event_body(shift, employee)?;
        let (method, url) = sync_target(
            &config.google_calendar_api_url,
            &calendar_id,
            shift.calendar_event_id.as_deref(),
        )?;
        let response = self
            .request(method, url, &config)
            .json(&body)
            .send()
            .await
            .map_err(sync_failed)?
            .error_for_status()
            .map_err(sync_failed)?
            .json::<EventResponse>()
            .await
            .map_err(sync_failed)?;
        Ok(response
            .id
            .map(Arc::from)
            .or_else(|| shift.calendar_event_id.clone()))
    }

    #[instrument(skip(self))]
    async fn delete_event(&self, event_id: &str) -> Result<(), ServiceError> {
        let config = self.config_service.get_config().await?;
        let Some(calendar_id) = config.google_calendar_id.clone() else {
            return Ok(());
        };
        let url = events_url(&config.google_calendar_api_url, &calendar_id, Some(event_id))?;
        self.request(Method::DELETE, url, &config)
            .send()
            .await
            .map_err(sync_failed)?
            .error_for_status()
            .map_err(sync_failed)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn week_events(&self, date: time::Date) -> Result<Arc<[CalendarEvent]>, ServiceError> {
        let config = self.config_service.get_config().await?;
        let Some(calendar_id) = config.google_calendar_id.clone() else {
            return Ok([].into());
        };
        let url = week_events_url(
            &config.google_calendar_api_url,
            &calendar_id,
            StoreWeek::containing(date),
        )?;
        match self.get_json::<EventListResponse>(url, &config).await {
            Ok(list) => Ok(list.items.into_iter().map(CalendarEvent::from).collect()),
            Err(err) => {
                warn!("Could not read calendar events: {}", err);
                Ok([].into())
            }
        }
    }

    #[instrument(skip(self))]
    async fn heartbeat(&self) -> Result<bool, ServiceError> {
        let config = self.config_service.get_config().await?;
        let Some(calendar_id) = config.google_calendar_id.clone() else {
            info!("No calendar configured");
            return Ok(false);
        };
        let url = calendar_list_url(&config.google_calendar_api_url)?;
        match self.get_json::<CalendarListResponse>(url, &config).await {
            Ok(list) => Ok(list.contains(&calendar_id)),
            Err(err) => {
                warn!("Calendar connection check failed: {}", err);
                Ok(false)
            }
        }
    }
}
