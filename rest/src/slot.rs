use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
    Extension,
};
use rest_types::{SlotWindowTO, TimeSlotTO};
use serde::Deserialize;
use service::{slot::SlotService, ServiceError};
use tracing::instrument;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{error_handler, json_response, Context, RestStateDef};

#[derive(Clone, Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SlotQueryParams {
    pub employee_id: Option<Uuid>,
    #[param(example = "2024-06-12")]
    pub date: Option<time::Date>,
    /// Slot length, defaults to the configured duration.
    #[param(example = "30")]
    pub slot_minutes: Option<u16>,
    /// Cut the slots from the employee's shift or from the store hours.
    #[serde(default)]
    pub window: SlotWindowTO,
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/slots",
    tags = ["Reservations"],
    params(SlotQueryParams),
    responses(
        (status = 200, description = "Slots of the day with their availability", body = [TimeSlotTO]),
        (status = 400, description = "Employee id or date missing"),
        (status = 404, description = "No shift on that date"),
    ),
)]
pub async fn get_available_slots<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Query(params): Query<SlotQueryParams>,
) -> Response {
    error_handler(
        (async {
            let employee_id = params
                .employee_id
                .ok_or_else(|| ServiceError::MissingParameter("employee_id".into()))?;
            let date = params
                .date
                .ok_or_else(|| ServiceError::MissingParameter("date".into()))?;
            let slots: Arc<[TimeSlotTO]> = rest_state
                .slot_service()
                .available_slots(
                    employee_id,
                    date,
                    params.slot_minutes,
                    params.window.into(),
                    context.into(),
                    None,
                )
                .await?
                .iter()
                .map(TimeSlotTO::from)
                .collect();
            Ok(json_response(200, &slots))
        })
        .await,
    )
}
