use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use rest_types::{DeleteConfirmationTO, ShiftTO, ShiftUpdateTO};
use serde::Deserialize;
use service::shift::{Shift, ShiftFilter, ShiftService, ShiftUpdate};
use tracing::instrument;
use utoipa::{IntoParams, OpenApi};
use uuid::Uuid;

use crate::{error_handler, json_response, Context, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", get(get_all_shifts::<RestState>))
        .route("/", post(create_shift::<RestState>))
        .route("/weekly", get(get_weekly_shifts::<RestState>))
        .route("/{id}", get(get_shift::<RestState>))
        .route("/{id}", put(update_shift::<RestState>))
        .route("/{id}", delete(delete_shift::<RestState>))
        .route("/{id}/publish", post(publish_shift::<RestState>))
}

#[derive(Clone, Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShiftQueryParams {
    pub store_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    #[param(example = "2024-06-10")]
    pub start_date: Option<time::Date>,
    #[param(example = "2024-06-16")]
    pub end_date: Option<time::Date>,
}

#[derive(Clone, Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeeklyShiftParams {
    pub store_id: Option<Uuid>,
    /// Any date of the requested week.
    #[param(example = "2024-06-12")]
    pub date: Option<time::Date>,
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "",
    tags = ["Shifts"],
    params(ShiftQueryParams),
    responses(
        (status = 200, description = "Shifts matching the filter", body = [ShiftTO]),
        (status = 400, description = "Invalid date range"),
    ),
)]
pub async fn get_all_shifts<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Query(params): Query<ShiftQueryParams>,
) -> Response {
    error_handler(
        (async {
            let filter = ShiftFilter {
                store_id: params.store_id,
                employee_id: params.employee_id,
                from: params.start_date,
                to: params.end_date,
            };
            let shifts: Arc<[ShiftTO]> = rest_state
                .shift_service()
                .get_all(&filter, context.into(), None)
                .await?
                .iter()
                .map(ShiftTO::from)
                .collect();
            Ok(json_response(200, &shifts))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/weekly",
    tags = ["Shifts"],
    params(WeeklyShiftParams),
    responses(
        (status = 200, description = "Shifts of the Monday to Sunday week", body = [ShiftTO]),
        (status = 400, description = "Store id or date missing"),
    ),
)]
pub async fn get_weekly_shifts<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Query(params): Query<WeeklyShiftParams>,
) -> Response {
    error_handler(
        (async {
            let shifts: Arc<[ShiftTO]> = rest_state
                .shift_service()
                .get_weekly(params.store_id, params.date, context.into(), None)
                .await?
                .iter()
                .map(ShiftTO::from)
                .collect();
            Ok(json_response(200, &shifts))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/{id}",
    tags = ["Shifts"],
    params(
        ("id", description = "Shift id", example = "c3e8a1f4-6d2b-4a9c-8e7f-1b5d0a3c9e62"),
    ),
    responses(
        (status = 200, description = "Shift found", body = ShiftTO),
        (status = 404, description = "Shift not found"),
    ),
)]
pub async fn get_shift<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let shift = ShiftTO::from(
                &rest_state
                    .shift_service()
                    .get(id, context.into(), None)
                    .await?,
            );
            Ok(json_response(200, &shift))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    post,
    path = "",
    tags = ["Shifts"],
    request_body = ShiftTO,
    responses(
        (status = 201, description = "Shift created", body = ShiftTO),
        (status = 400, description = "Outside store hours, blocked, over hours or over budget"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee or store not found"),
        (status = 500, description = "Calendar sync failed"),
    ),
)]
pub async fn create_shift<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Json(shift): Json<ShiftTO>,
) -> Response {
    error_handler(
        (async {
            let shift = Shift::try_from(&shift)?;
            let shift = ShiftTO::from(
                &rest_state
                    .shift_service()
                    .create(&shift, context.into(), None)
                    .await?,
            );
            Ok(json_response(201, &shift))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    put,
    path = "/{id}",
    tags = ["Shifts"],
    params(
        ("id", description = "Shift id", example = "c3e8a1f4-6d2b-4a9c-8e7f-1b5d0a3c9e62"),
    ),
    request_body = ShiftUpdateTO,
    responses(
        (status = 200, description = "Shift updated", body = ShiftTO),
        (status = 400, description = "Outside store hours, blocked, over hours or over budget"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Shift or weekly stats not found"),
    ),
)]
pub async fn update_shift<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(id): Path<Uuid>,
    Json(update): Json<ShiftUpdateTO>,
) -> Response {
    error_handler(
        (async {
            let update = ShiftUpdate::try_from(&update)?;
            let shift = ShiftTO::from(
                &rest_state
                    .shift_service()
                    .update(id, &update, context.into(), None)
                    .await?,
            );
            Ok(json_response(200, &shift))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    delete,
    path = "/{id}",
    tags = ["Shifts"],
    params(
        ("id", description = "Shift id", example = "c3e8a1f4-6d2b-4a9c-8e7f-1b5d0a3c9e62"),
    ),
    responses(
        (status = 200, description = "Shift deleted", body = DeleteConfirmationTO),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Shift not found"),
    ),
)]
pub async fn delete_shift<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let confirmation = DeleteConfirmationTO::from(
                &rest_state
                    .shift_service()
                    .delete(id, context.into(), None)
                    .await?,
            );
            Ok(json_response(200, &confirmation))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    post,
    path = "/{id}/publish",
    tags = ["Shifts"],
    params(
        ("id", description = "Shift id", example = "c3e8a1f4-6d2b-4a9c-8e7f-1b5d0a3c9e62"),
    ),
    responses(
        (status = 200, description = "Shift published", body = ShiftTO),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Shift not found"),
    ),
)]
pub async fn publish_shift<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let shift = ShiftTO::from(
                &rest_state
                    .shift_service()
                    .publish(id, context.into(), None)
                    .await?,
            );
            Ok(json_response(200, &shift))
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        get_all_shifts,
        get_weekly_shifts,
        get_shift,
        create_shift,
        update_shift,
        delete_shift,
        publish_shift,
    ),
    components(schemas(ShiftTO, ShiftUpdateTO, DeleteConfirmationTO))
)]
pub struct ShiftApiDoc;
