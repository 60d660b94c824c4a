use std::sync::Arc;

mod availability;
mod calendar;
mod employee;
mod reservation;
mod session;
mod shift;
mod slot;
mod store;
mod weekly_stats;

use axum::{body::Body, middleware, response::Response, Router};
use serde::Serialize;
use service::ServiceError;
use shopshift_utils::ClockTimeError;
use thiserror::Error;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

pub use session::Context;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Service error")]
    ServiceError(#[from] ServiceError),

    #[error("Inconsistent id. Got {0} in path but {1} in body")]
    InconsistentId(Uuid, Uuid),

    #[error("{0}")]
    MalformedTime(#[from] ClockTimeError),
}

/// Status code of a failed service call.
pub fn service_error_status(err: &ServiceError) -> u16 {
    match err {
        ServiceError::EntityNotFound(_, _)
        | ServiceError::WeeklyStatsNotFound(_, _)
        | ServiceError::ShiftNotFoundOnDate(_, _) => 404,
        ServiceError::AvailabilityBlocked(_, _)
        | ServiceError::MaxHoursExceeded(_, _, _)
        | ServiceError::BudgetExceeded(_, _)
        | ServiceError::InvalidShiftWindow(_, _, _, _)
        | ServiceError::InvalidEmail(_)
        | ServiceError::InvalidPhone(_)
        | ServiceError::SlotUnavailable(_, _, _)
        | ServiceError::MissingParameter(_)
        | ServiceError::InvalidStatusTransition(_, _)
        | ServiceError::TimeOrderWrong(_, _)
        | ServiceError::DateOrderWrong(_, _) => 400,
        ServiceError::Unauthorized | ServiceError::MissingActorId => 401,
        ServiceError::Forbidden => 403,
        ServiceError::EntityConflicts(_, _, _)
        | ServiceError::EntityAlreadyExists(_)
        | ServiceError::EmployeeHasShifts(_, _) => 409,
        ServiceError::ValidationError(_)
        | ServiceError::IdSetOnCreate
        | ServiceError::VersionSetOnCreate
        | ServiceError::DeletedSetOnCreate
        | ServiceError::CreatedSetOnCreate => 422,
        ServiceError::CalendarSyncFailed(_)
        | ServiceError::DatabaseQueryError(_)
        | ServiceError::TimeComponentRange(_)
        | ServiceError::InternalError => 500,
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: u16, message: String) -> Response {
    let body = serde_json::to_string(&ErrorBody { error: message }).unwrap();
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::new(body))
        .unwrap()
}

fn error_handler(result: Result<Response, RestError>) -> Response {
    match result {
        Ok(response) => response,
        Err(err @ RestError::InconsistentId(_, _)) => error_response(400, err.to_string()),
        Err(err @ RestError::MalformedTime(_)) => error_response(400, err.to_string()),
        Err(RestError::ServiceError(err)) => {
            let status = service_error_status(&err);
            if status >= 500 {
                error!("Request failed: {}", err);
            } else {
                info!("Request rejected with {}: {}", status, err);
            }
            error_response(status, err.to_string())
        }
    }
}

fn json_response<T: Serialize>(status: u16, value: &T) -> Response {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::new(serde_json::to_string(value).unwrap()))
        .unwrap()
}

pub trait RestStateDef: Clone + Send + Sync + 'static {
    type StoreService: service::store::StoreService<Context = Context> + Send + Sync + 'static;
    type EmployeeService: service::employee::EmployeeService<Context = Context>
        + Send
        + Sync
        + 'static;
    type AvailabilityService: service::availability::AvailabilityService<Context = Context>
        + Send
        + Sync
        + 'static;
    type ShiftService: service::shift::ShiftService<Context = Context> + Send + Sync + 'static;
    type WeeklyStatsService: service::weekly_stats::WeeklyStatsService<Context = Context>
        + Send
        + Sync
        + 'static;
    type SlotService: service::slot::SlotService<Context = Context> + Send + Sync + 'static;
    type ReservationService: service::reservation::ReservationService<Context = Context>
        + Send
        + Sync
        + 'static;
    type CalendarService: service::calendar::CalendarService + Send + Sync + 'static;

    fn store_service(&self) -> Arc<Self::StoreService>;
    fn employee_service(&self) -> Arc<Self::EmployeeService>;
    fn availability_service(&self) -> Arc<Self::AvailabilityService>;
    fn shift_service(&self) -> Arc<Self::ShiftService>;
    fn weekly_stats_service(&self) -> Arc<Self::WeeklyStatsService>;
    fn slot_service(&self) -> Arc<Self::SlotService>;
    fn reservation_service(&self) -> Arc<Self::ReservationService>;
    fn calendar_service(&self) -> Arc<Self::CalendarService>;
}

#[derive(OpenApi)]
#[openapi(
    nest(
        (path = "/api/stores", api = store::StoreApiDoc),
        (path = "/api/employees", api = employee::EmployeeApiDoc),
        (path = "/api/availability", api = availability::AvailabilityApiDoc),
        (path = "/api/shifts", api = shift::ShiftApiDoc),
        (path = "/api/weekly-stats", api = weekly_stats::WeeklyStatsApiDoc),
        (path = "/api/reservations", api = reservation::ReservationApiDoc),
        (path = "/api/google-calendar", api = calendar::CalendarApiDoc),
    ),
)]
pub struct ApiDoc;

pub fn build_router<RestState: RestStateDef>(rest_state: RestState) -> Router {
    Router::new()
        .nest("/api/stores", store::generate_route())
        .nest("/api/employees", employee::generate_route())
        .nest("/api/availability", availability::generate_route())
        .nest("/api/shifts", shift::generate_route())
        .nest("/api/weekly-stats", weekly_stats::generate_route())
        .nest("/api/reservations", reservation::generate_route())
        .nest("/api/google-calendar", calendar::generate_route())
        .layer(middleware::from_fn(session::context_extractor))
        .with_state(rest_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

pub async fn start_server<RestState: RestStateDef>(
    rest_state: RestState,
    address: &str,
) -> std::io::Result<()> {
    let app = build_router(rest_state);
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!("Listening on {}", address);
    axum::serve(listener, app).await
}
