use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    response::Response,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use rest_types::AvailabilityTO;
use serde::Deserialize;
use service::availability::{Availability, AvailabilityService};
use tracing::instrument;
use utoipa::{IntoParams, OpenApi};
use uuid::Uuid;

use crate::{error_handler, json_response, Context, RestError, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route(
            "/employee/{employee_id}",
            get(get_availability_by_employee::<RestState>),
        )
        .route("/", post(create_availability::<RestState>))
        .route("/{id}", put(update_availability::<RestState>))
        .route("/{id}", delete(delete_availability::<RestState>))
}

#[derive(Clone, Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityRangeParams {
    #[param(example = "2024-06-10")]
    pub start_date: Option<time::Date>,
    #[param(example = "2024-06-16")]
    pub end_date: Option<time::Date>,
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/employee/{employee_id}",
    tags = ["Availability"],
    params(
        ("employee_id", description = "Employee id", example = "8a1d6f3e-2c4b-4e9a-b7d5-0f3c9e1a6b24"),
        AvailabilityRangeParams,
    ),
    responses(
        (status = 200, description = "Availability entries of the employee", body = [AvailabilityTO]),
        (status = 403, description = "Forbidden"),
    ),
)]
pub async fn get_availability_by_employee<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(employee_id): Path<Uuid>,
    Query(params): Query<AvailabilityRangeParams>,
) -> Response {
    error_handler(
        (async {
            let entries: Arc<[AvailabilityTO]> = rest_state
                .availability_service()
                .get_by_employee(
                    employee_id,
                    params.start_date,
                    params.end_date,
                    context.into(),
                    None,
                )
                .await?
                .iter()
                .map(AvailabilityTO::from)
                .collect();
            Ok(json_response(200, &entries))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    post,
    path = "",
    tags = ["Availability"],
    request_body = AvailabilityTO,
    responses(
        (status = 201, description = "Availability entry created", body = AvailabilityTO),
        (status = 400, description = "Invalid time range"),
        (status = 403, description = "Forbidden"),
    ),
)]
pub async fn create_availability<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Json(availability): Json<AvailabilityTO>,
) -> Response {
    error_handler(
        (async {
            let availability = Availability::try_from(&availability)?;
            let availability = AvailabilityTO::from(
                &rest_state
                    .availability_service()
                    .create(&availability, context.into(), None)
                    .await?,
            );
            Ok(json_response(201, &availability))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    put,
    path = "/{id}",
    tags = ["Availability"],
    params(
        ("id", description = "Availability id", example = "5e2a7c1d-9b3f-4d8e-a6c2-7f1b0d4e9a33"),
    ),
    request_body = AvailabilityTO,
    responses(
        (status = 200, description = "Availability entry updated", body = AvailabilityTO),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Availability entry not found"),
    ),
)]
pub async fn update_availability<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(id): Path<Uuid>,
    Json(availability): Json<AvailabilityTO>,
) -> Response {
    error_handler(
        (async {
            if availability.id != id {
                return Err(RestError::InconsistentId(id, availability.id));
            }
            let availability = Availability::try_from(&availability)?;
            let availability = AvailabilityTO::from(
                &rest_state
                    .availability_service()
                    .update(&availability, context.into(), None)
                    .await?,
            );
            Ok(json_response(200, &availability))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    delete,
    path = "/{id}",
    tags = ["Availability"],
    params(
        ("id", description = "Availability id", example = "5e2a7c1d-9b3f-4d8e-a6c2-7f1b0d4e9a33"),
    ),
    responses(
        (status = 204, description = "Availability entry deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Availability entry not found"),
    ),
)]
pub async fn delete_availability<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            rest_state
                .availability_service()
                .delete(id, context.into(), None)
                .await?;
            Ok(Response::builder().status(204).body(Body::empty()).unwrap())
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        get_availability_by_employee,
        create_availability,
        update_availability,
        delete_availability,
    ),
    components(schemas(AvailabilityTO))
)]
pub struct AvailabilityApiDoc;
