use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    response::Response,
    routing::{get, post, put},
    Extension, Json, Router,
};
use rest_types::StoreTO;
use service::store::{Store, StoreService};
use tracing::instrument;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::{error_handler, json_response, Context, RestError, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", get(get_all_stores::<RestState>))
        .route("/", post(create_store::<RestState>))
        .route("/{id}", get(get_store::<RestState>))
        .route("/{id}", put(update_store::<RestState>))
        .route("/{id}", axum::routing::delete(delete_store::<RestState>))
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "",
    tags = ["Stores"],
    responses(
        (status = 200, description = "All stores", body = [StoreTO]),
    ),
)]
pub async fn get_all_stores<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
) -> Response {
    error_handler(
        (async {
            let stores: Arc<[StoreTO]> = rest_state
                .store_service()
                .get_all(context.into(), None)
                .await?
                .iter()
                .map(StoreTO::from)
                .collect();
            Ok(json_response(200, &stores))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/{id}",
    tags = ["Stores"],
    params(
        ("id", description = "Store id", example = "3d0b9c5e-8f1a-4b27-a6d4-1e9f0c2b7a55"),
    ),
    responses(
        (status = 200, description = "Store found", body = StoreTO),
        (status = 404, description = "Store not found"),
    ),
)]
pub async fn get_store<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let store = StoreTO::from(
                &rest_state
                    .store_service()
                    .get(id, context.into(), None)
                    .await?,
            );
            Ok(json_response(200, &store))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    post,
    path = "",
    tags = ["Stores"],
    request_body = StoreTO,
    responses(
        (status = 201, description = "Store created", body = StoreTO),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Forbidden"),
    ),
)]
pub async fn create_store<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Json(store): Json<StoreTO>,
) -> Response {
    error_handler(
        (async {
            let store = Store::try_from(&store)?;
            let store = StoreTO::from(
                &rest_state
                    .store_service()
                    .create(&store, context.into(), None)
                    .await?,
            );
            Ok(json_response(201, &store))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    put,
    path = "/{id}",
    tags = ["Stores"],
    params(
        ("id", description = "Store id", example = "3d0b9c5e-8f1a-4b27-a6d4-1e9f0c2b7a55"),
    ),
    request_body = StoreTO,
    responses(
        (status = 200, description = "Store updated", body = StoreTO),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Store not found"),
    ),
)]
pub async fn update_store<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(id): Path<Uuid>,
    Json(store): Json<StoreTO>,
) -> Response {
    error_handler(
        (async {
            if store.id != id {
                return Err(RestError::InconsistentId(id, store.id));
            }
            let store = Store::try_from(&store)?;
            let store = StoreTO::from(
                &rest_state
                    .store_service()
                    .update(&store, context.into(), None)
                    .await?,
            );
            Ok(json_response(200, &store))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    delete,
    path = "/{id}",
    tags = ["Stores"],
    params(
        ("id", description = "Store id", example = "3d0b9c5e-8f1a-4b27-a6d4-1e9f0c2b7a55"),
    ),
    responses(
        (status = 204, description = "Store deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Store not found"),
    ),
)]
pub async fn delete_store<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            rest_state
                .store_service()
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
        get_all_stores,
        get_store,
        create_store,
        update_store,
        delete_store,
    ),
    components(schemas(StoreTO))
)]
pub struct StoreApiDoc;
