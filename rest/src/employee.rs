use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    response::Response,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use rest_types::{EmployeeTO, EmployeeTypeTO, ResetHoursTO};
use serde::Deserialize;
use service::employee::EmployeeService;
use tracing::instrument;
use utoipa::{IntoParams, OpenApi};
use uuid::Uuid;

use crate::{error_handler, json_response, Context, RestError, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", get(get_all_employees::<RestState>))
        .route("/", post(create_employee::<RestState>))
        .route("/{id}", get(get_employee::<RestState>))
        .route("/{id}", put(update_employee::<RestState>))
        .route("/{id}", delete(delete_employee::<RestState>))
        .route(
            "/reset-hours/{store_id}",
            post(reset_employee_hours::<RestState>),
        )
}

#[derive(Clone, Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmployeeQueryParams {
    pub store_id: Option<Uuid>,
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "",
    tags = ["Employees"],
    params(EmployeeQueryParams),
    responses(
        (status = 200, description = "Employees, optionally of one store", body = [EmployeeTO]),
    ),
)]
pub async fn get_all_employees<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Query(params): Query<EmployeeQueryParams>,
) -> Response {
    error_handler(
        (async {
            let employees: Arc<[EmployeeTO]> = rest_state
                .employee_service()
                .get_all(params.store_id, context.into(), None)
                .await?
                .iter()
                .map(EmployeeTO::from)
                .collect();
            Ok(json_response(200, &employees))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/{id}",
    tags = ["Employees"],
    params(
        ("id", description = "Employee id", example = "8a1d6f3e-2c4b-4e9a-b7d5-0f3c9e1a6b24"),
    ),
    responses(
        (status = 200, description = "Employee found", body = EmployeeTO),
        (status = 404, description = "Employee not found"),
    ),
)]
pub async fn get_employee<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let employee = EmployeeTO::from(
                &rest_state
                    .employee_service()
                    .get(id, context.into(), None)
                    .await?,
            );
            Ok(json_response(200, &employee))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    post,
    path = "",
    tags = ["Employees"],
    request_body = EmployeeTO,
    responses(
        (status = 201, description = "Employee created", body = EmployeeTO),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Email already in use"),
        (status = 422, description = "Missing name or email"),
    ),
)]
pub async fn create_employee<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Json(employee): Json<EmployeeTO>,
) -> Response {
    error_handler(
        (async {
            let employee = EmployeeTO::from(
                &rest_state
                    .employee_service()
                    .create(&(&employee).into(), context.into(), None)
                    .await?,
            );
            Ok(json_response(201, &employee))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    put,
    path = "/{id}",
    tags = ["Employees"],
    params(
        ("id", description = "Employee id", example = "8a1d6f3e-2c4b-4e9a-b7d5-0f3c9e1a6b24"),
    ),
    request_body = EmployeeTO,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeTO),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Version conflict"),
    ),
)]
pub async fn update_employee<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(id): Path<Uuid>,
    Json(employee): Json<EmployeeTO>,
) -> Response {
    error_handler(
        (async {
            if employee.id != id {
                return Err(RestError::InconsistentId(id, employee.id));
            }
            let employee = EmployeeTO::from(
                &rest_state
                    .employee_service()
                    .update(&(&employee).into(), context.into(), None)
                    .await?,
            );
            Ok(json_response(200, &employee))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    delete,
    path = "/{id}",
    tags = ["Employees"],
    params(
        ("id", description = "Employee id", example = "8a1d6f3e-2c4b-4e9a-b7d5-0f3c9e1a6b24"),
    ),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found"),
    ),
)]
pub async fn delete_employee<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            rest_state
                .employee_service()
                .delete(id, context.into(), None)
                .await?;
            Ok(Response::builder().status(204).body(Body::empty()).unwrap())
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    post,
    path = "/reset-hours/{store_id}",
    tags = ["Employees"],
    params(
        ("store_id", description = "Store id", example = "3d0b9c5e-8f1a-4b27-a6d4-1e9f0c2b7a55"),
    ),
    responses(
        (status = 200, description = "Worked hours reset", body = ResetHoursTO),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Store has no employees"),
    ),
)]
pub async fn reset_employee_hours<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(store_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let employees_reset = rest_state
                .employee_service()
                .reset_hours(store_id, context.into(), None)
                .await?;
            Ok(json_response(
                200,
                &ResetHoursTO {
                    store_id,
                    employees_reset,
                },
            ))
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        get_all_employees,
        get_employee,
        create_employee,
        update_employee,
        delete_employee,
        reset_employee_hours,
    ),
    components(schemas(EmployeeTO, EmployeeTypeTO, ResetHoursTO))
)]
pub struct EmployeeApiDoc;
