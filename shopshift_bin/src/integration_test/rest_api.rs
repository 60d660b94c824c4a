use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::integration_test::TestSetup;

fn json_request(method: &str, uri: &str, role: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("x-actor-role", role)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str, role: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-actor-role", role)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn store_body(open_time: &str) -> serde_json::Value {
    serde_json::json!({
        "name": "Downtown",
        "weekly_budget": 1000,
        "open_time": open_time,
        "close_time": "17:00",
    })
}

#[tokio::test]
async fn test_manager_creates_store() {
    let test_setup = TestSetup::new().await;
    let app = rest::build_router(test_setup.rest_state.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/stores",
            "manager",
            store_body("09:00"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let store = body_json(response).await;
    assert_eq!(store["name"], "Downtown");
    assert_eq!(store["open_time"], "09:00");
    assert_eq!(store["weekly_budget"], 1000.0);
}

#[tokio::test]
async fn test_malformed_clock_time_is_bad_request() {
    let test_setup = TestSetup::new().await;
    let app = rest::build_router(test_setup.rest_state.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/stores",
            "manager",
            store_body("9am"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert!(error["error"].as_str().unwrap().contains("9am"));
}

#[tokio::test]
async fn test_associate_cannot_create_store() {
    let test_setup = TestSetup::new().await;
    let app = rest::build_router(test_setup.rest_state.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/stores",
            "associate",
            store_body("09:00"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_customer_without_id_is_unauthorized() {
    let test_setup = TestSetup::new().await;
    let app = rest::build_router(test_setup.rest_state.clone());

    let response = app
        .oneshot(get_request("/api/reservations", "customer"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_weekly_shifts_require_store_and_date() {
    let test_setup = TestSetup::new().await;
    let app = rest::build_router(test_setup.rest_state.clone());

    let response = app
        .oneshot(get_request("/api/shifts/weekly?date=2024-06-12", "manager"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert!(error["error"].as_str().unwrap().contains("store_id"));
}

#[tokio::test]
async fn test_calendar_events_require_date() {
    let test_setup = TestSetup::new().await;
    let app = rest::build_router(test_setup.rest_state.clone());

    let response = app
        .oneshot(get_request("/api/google-calendar/events", "manager"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert!(error["error"].as_str().unwrap().contains("date"));
}

#[tokio::test]
async fn test_calendar_without_configuration() {
    let test_setup = TestSetup::new().await;
    let app = rest::build_router(test_setup.rest_state.clone());

    let response = app
        .clone()
        .oneshot(get_request(
            "/api/google-calendar/events?date=2024-06-12",
            "manager",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));

    let response = app
        .oneshot(get_request("/api/google-calendar/heartbeat", "manager"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["google_calendar_connected"],
        false
    );
}
