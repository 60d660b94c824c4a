use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, put},
    Extension, Json, Router,
};
use rest_types::{WeeklyStatsTO, WeeklyStatsUpdateTO};
use serde::Deserialize;
use service::weekly_stats::WeeklyStatsService;
use tracing::instrument;
use utoipa::{IntoParams, OpenApi};
use uuid::Uuid;

use crate::{error_handler, json_response, Context, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", get(get_weekly_stats::<RestState>))
        .route("/history", get(get_weekly_stats_history::<RestState>))
        .route("/{id}", put(update_weekly_stats::<RestState>))
}

#[derive(Clone, Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeeklyStatsParams {
    pub store_id: Uuid,
    /// Any date of the requested week, defaults to today.
    #[param(example = "2024-06-12")]
    pub date: Option<time::Date>,
}

#[derive(Clone, Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeeklyStatsHistoryParams {
    pub store_id: Uuid,
    /// Number of weeks, defaults to 4.
    #[param(example = "4")]
    pub weeks: Option<u8>,
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "",
    tags = ["Weekly Stats"],
    params(WeeklyStatsParams),
    responses(
        (status = 200, description = "Stats of the week, created on first access", body = WeeklyStatsTO),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Store not found"),
    ),
)]
pub async fn get_weekly_stats<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Query(params): Query<WeeklyStatsParams>,
) -> Response {
    error_handler(
        (async {
            let stats = WeeklyStatsTO::from(
                &rest_state
                    .weekly_stats_service()
                    .get_for_week(params.store_id, params.date, context.into(), None)
                    .await?,
            );
            Ok(json_response(200, &stats))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/history",
    tags = ["Weekly Stats"],
    params(WeeklyStatsHistoryParams),
    responses(
        (status = 200, description = "Stats of the recent weeks, oldest first", body = [WeeklyStatsTO]),
        (status = 403, description = "Forbidden"),
    ),
)]
pub async fn get_weekly_stats_history<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Query(params): Query<WeeklyStatsHistoryParams>,
) -> Response {
    error_handler(
        (async {
            let history: Arc<[WeeklyStatsTO]> = rest_state
                .weekly_stats_service()
                .history(params.store_id, params.weeks, context.into(), None)
                .await?
                .iter()
                .map(WeeklyStatsTO::from)
                .collect();
            Ok(json_response(200, &history))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    put,
    path = "/{id}",
    tags = ["Weekly Stats"],
    params(
        ("id", description = "Weekly stats id", example = "9d4f2a6c-1e8b-4c3d-b5a7-6e0f3d9c2b18"),
    ),
    request_body = WeeklyStatsUpdateTO,
    responses(
        (status = 200, description = "Budget or notes updated", body = WeeklyStatsTO),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Weekly stats not found"),
    ),
)]
pub async fn update_weekly_stats<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(id): Path<Uuid>,
    Json(update): Json<WeeklyStatsUpdateTO>,
) -> Response {
    error_handler(
        (async {
            let stats = WeeklyStatsTO::from(
                &rest_state
                    .weekly_stats_service()
                    .update(
                        id,
                        update.budget_allocated,
                        update.notes.clone(),
                        context.into(),
                        None,
                    )
                    .await?,
            );
            Ok(json_response(200, &stats))
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(get_weekly_stats, get_weekly_stats_history, update_weekly_stats),
    components(schemas(WeeklyStatsTO, WeeklyStatsUpdateTO))
)]
pub struct WeeklyStatsApiDoc;
