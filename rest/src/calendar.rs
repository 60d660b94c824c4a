use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
    routing::get,
    Router,
};
use rest_types::{CalendarEventTO, CalendarHeartbeatTO};
use serde::Deserialize;
use service::{calendar::CalendarService, ServiceError};
use tracing::instrument;
use utoipa::{IntoParams, OpenApi};

use crate::{error_handler, json_response, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/events", get(get_week_events::<RestState>))
        .route("/heartbeat", get(get_heartbeat::<RestState>))
}

#[derive(Clone, Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeekEventsParams {
    /// Any date of the requested week.
    #[param(example = "2024-06-12")]
    pub date: Option<time::Date>,
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/events",
    tags = ["Calendar"],
    params(WeekEventsParams),
    responses(
        (status = 200, description = "Calendar events of the week", body = [CalendarEventTO]),
        (status = 400, description = "Date missing"),
    ),
)]
pub async fn get_week_events<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Query(params): Query<WeekEventsParams>,
) -> Response {
    error_handler(
        (async {
            let date = params
                .date
                .ok_or_else(|| ServiceError::MissingParameter("date".into()))?;
            let events: Arc<[CalendarEventTO]> = rest_state
                .calendar_service()
                .week_events(date)
                .await?
                .iter()
                .map(CalendarEventTO::from)
                .collect();
            Ok(json_response(200, &events))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/heartbeat",
    tags = ["Calendar"],
    responses(
        (status = 200, description = "Whether the configured calendar is reachable", body = CalendarHeartbeatTO),
    ),
)]
pub async fn get_heartbeat<RestState: RestStateDef>(rest_state: State<RestState>) -> Response {
    error_handler(
        (async {
            let google_calendar_connected = rest_state.calendar_service().heartbeat().await?;
            Ok(json_response(
                200,
                &CalendarHeartbeatTO {
                    google_calendar_connected,
                },
            ))
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(get_week_events, get_heartbeat),
    components(schemas(CalendarEventTO, CalendarHeartbeatTO))
)]
pub struct CalendarApiDoc;
