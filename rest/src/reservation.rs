use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use rest_types::{
    ReservationRequestTO, ReservationStatusTO, ReservationStatusUpdateTO, ReservationTO,
    SlotWindowTO, TimeSlotTO,
};
use serde::Deserialize;
use service::reservation::{
    ReservationDuration, ReservationQuery, ReservationRequest, ReservationService,
};
use service::ServiceError;
use shopshift_utils::parse_clock_time;
use tracing::instrument;
use utoipa::{IntoParams, OpenApi};
use uuid::Uuid;

use crate::{error_handler, json_response, slot, Context, RestError, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", get(get_reservations::<RestState>))
        .route("/", post(create_reservation::<RestState>))
        .route("/dates", get(get_available_dates::<RestState>))
        .route("/slots", get(slot::get_available_slots::<RestState>))
        .route("/{id}", get(get_reservation::<RestState>))
        .route("/{id}/status", patch(update_reservation_status::<RestState>))
        .route("/{id}/cancel", post(cancel_reservation::<RestState>))
}

fn reservation_request(request: &ReservationRequestTO) -> Result<ReservationRequest, RestError> {
    Ok(ReservationRequest {
        employee_id: request.employee_id,
        name: request.name.clone(),
        email: request.email.clone(),
        phone: request.phone.clone(),
        date: request.date,
        start_time: parse_clock_time(&request.start_time)?,
        duration: ReservationDuration::try_from(request.duration)?,
        notes: request.notes.clone(),
    })
}

#[derive(Clone, Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReservationQueryParams {
    pub employee_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    #[param(example = "2024-06-10")]
    pub start_date: Option<time::Date>,
    #[param(example = "2024-06-16")]
    pub end_date: Option<time::Date>,
    pub status: Option<ReservationStatusTO>,
}

#[derive(Clone, Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailableDatesParams {
    pub employee_id: Option<Uuid>,
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    post,
    path = "",
    tags = ["Reservations"],
    request_body = ReservationRequestTO,
    responses(
        (status = 201, description = "Reservation confirmed", body = ReservationTO),
        (status = 400, description = "Invalid contact data or slot taken"),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Unsupported duration"),
    ),
)]
pub async fn create_reservation<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Json(request): Json<ReservationRequestTO>,
) -> Response {
    error_handler(
        (async {
            let request = reservation_request(&request)?;
            let reservation = ReservationTO::from(
                &rest_state
                    .reservation_service()
                    .create(&request, context.into(), None)
                    .await?,
            );
            Ok(json_response(201, &reservation))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "",
    tags = ["Reservations"],
    params(ReservationQueryParams),
    responses(
        (status = 200, description = "Reservations visible to the acting user", body = [ReservationTO]),
        (status = 401, description = "No acting user"),
    ),
)]
pub async fn get_reservations<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Query(params): Query<ReservationQueryParams>,
) -> Response {
    error_handler(
        (async {
            let query = ReservationQuery {
                employee_id: params.employee_id,
                customer_id: params.customer_id,
                start_date: params.start_date,
                end_date: params.end_date,
                status: params.status.map(Into::into),
            };
            let reservations: Arc<[ReservationTO]> = rest_state
                .reservation_service()
                .get_reservations(&query, context.into(), None)
                .await?
                .iter()
                .map(ReservationTO::from)
                .collect();
            Ok(json_response(200, &reservations))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/{id}",
    tags = ["Reservations"],
    params(
        ("id", description = "Reservation id", example = "2b7e4c9a-5d1f-4e3b-9c8a-0d6f2e1b7c45"),
    ),
    responses(
        (status = 200, description = "Reservation found", body = ReservationTO),
        (status = 403, description = "Not visible to the acting user"),
        (status = 404, description = "Reservation not found"),
    ),
)]
pub async fn get_reservation<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let reservation = ReservationTO::from(
                &rest_state
                    .reservation_service()
                    .get(id, context.into(), None)
                    .await?,
            );
            Ok(json_response(200, &reservation))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    patch,
    path = "/{id}/status",
    tags = ["Reservations"],
    params(
        ("id", description = "Reservation id", example = "2b7e4c9a-5d1f-4e3b-9c8a-0d6f2e1b7c45"),
    ),
    request_body = ReservationStatusUpdateTO,
    responses(
        (status = 200, description = "Status changed", body = ReservationTO),
        (status = 400, description = "Transition not allowed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Reservation not found"),
    ),
)]
pub async fn update_reservation_status<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(id): Path<Uuid>,
    Json(update): Json<ReservationStatusUpdateTO>,
) -> Response {
    error_handler(
        (async {
            let reservation = ReservationTO::from(
                &rest_state
                    .reservation_service()
                    .update_status(id, update.status.into(), context.into(), None)
                    .await?,
            );
            Ok(json_response(200, &reservation))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    post,
    path = "/{id}/cancel",
    tags = ["Reservations"],
    params(
        ("id", description = "Reservation id", example = "2b7e4c9a-5d1f-4e3b-9c8a-0d6f2e1b7c45"),
    ),
    responses(
        (status = 200, description = "Reservation cancelled", body = ReservationTO),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Reservation not found"),
    ),
)]
pub async fn cancel_reservation<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let reservation = ReservationTO::from(
                &rest_state
                    .reservation_service()
                    .cancel(id, context.into(), None)
                    .await?,
            );
            Ok(json_response(200, &reservation))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/dates",
    tags = ["Reservations"],
    params(AvailableDatesParams),
    responses(
        (status = 200, description = "Upcoming dates with a shift", body = [time::Date]),
        (status = 400, description = "Employee id missing"),
    ),
)]
pub async fn get_available_dates<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Query(params): Query<AvailableDatesParams>,
) -> Response {
    error_handler(
        (async {
            let employee_id = params
                .employee_id
                .ok_or_else(|| ServiceError::MissingParameter("employee_id".into()))?;
            let dates = rest_state
                .reservation_service()
                .available_dates(employee_id, context.into(), None)
                .await?;
            Ok(json_response(200, &dates))
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create_reservation,
        get_reservations,
        get_reservation,
        update_reservation_status,
        cancel_reservation,
        get_available_dates,
        slot::get_available_slots,
    ),
    components(schemas(
        ReservationTO,
        ReservationRequestTO,
        ReservationStatusTO,
        ReservationStatusUpdateTO,
        TimeSlotTO,
        SlotWindowTO,
    ))
)]
pub struct ReservationApiDoc;
