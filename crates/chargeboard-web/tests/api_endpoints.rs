//! Integration tests for the dashboard API

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chargeboard_core::models::Session;
use chargeboard_core::{DashboardConfig, DataStore};
use chrono::NaiveDateTime;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn utc(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

fn session(charger: &str, contract: &str, start: &str, stop: &str) -> Session {
    Session::from_utc(
        charger.to_string(),
        Some("1".to_string()),
        Some(contract.to_string()),
        utc(start),
        utc(stop),
        chrono_tz::America::New_York,
    )
}

fn test_store() -> Arc<DataStore> {
    let sessions = vec![
        // Monday 2024-10-07 23:00 EDT for 2h
        session("CB-1", "Acme", "2024-10-08 03:00", "2024-10-08 05:00"),
        // Wednesday 2024-10-09 14:00 EDT for 1h
        session("CB-2", "Acme", "2024-10-09 18:00", "2024-10-09 19:00"),
        session("CB-5", "Beta", "2024-10-09 18:00", "2024-10-09 21:00"),
    ];
    Arc::new(DataStore::from_sessions(DashboardConfig::default(), sessions).unwrap())
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let router = chargeboard_web::create_router(test_store());
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn cell(body: &Value, hour: &str, weekday: &str) -> Value {
    body["figure"]["layout"]["annotations"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["x"] == hour && a["y"] == weekday)
        .cloned()
        .unwrap()
}

#[tokio::test]
async fn test_index_page() {
    let router = chargeboard_web::create_router(test_store());
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("CityVitae Contract Dashboard"));
    assert!(html.contains("Show All"));
}

#[tokio::test]
async fn test_contracts_endpoint() {
    let (status, body) = get("/api/contracts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contracts"], serde_json::json!(["Acme", "Beta"]));
    assert_eq!(body["default_contract"], "Acme");
    assert_eq!(body["title"], "CityVitae Contract Dashboard");
    assert_eq!(body["dates"]["default_start"], "2022-12-01");
    assert_eq!(body["dates"]["max_date"], "2024-12-31");
    assert_eq!(body["overview"][0]["sessions"], 2);
}

#[tokio::test]
async fn test_chargers_endpoint() {
    let (status, body) = get("/api/contracts/Acme/chargers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chargers"], serde_json::json!(["CB-1", "CB-2"]));

    let (status, body) = get("/api/contracts/Nobody/chargers").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Nobody"));
}

#[tokio::test]
async fn test_heatmap_counts_with_rollover() {
    let (status, body) =
        get("/api/heatmap?contract=Acme&start=2024-10-01&end=2024-10-31").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["summary"]["sessions"], 2);
    assert_eq!(body["summary"]["session_hours"], 3);
    assert_eq!(cell(&body, "23", "Monday")["text"], "<b>1</b>");
    assert_eq!(cell(&body, "00", "Tuesday")["text"], "<b>1</b>");
    assert_eq!(cell(&body, "14", "Wednesday")["text"], "<b>1</b>");
    assert!(body["highlight"].is_null());
    assert_eq!(body["figure"]["layout"]["shapes"], serde_json::json!([]));
}

#[tokio::test]
async fn test_heatmap_defaults_to_first_contract() {
    let (status, body) = get("/api/heatmap").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contract"], "Acme");
    assert_eq!(body["start"], "2022-12-01");
    assert_eq!(body["end"], "2024-10-31");
}

#[tokio::test]
async fn test_click_highlights_cell() {
    let (status, body) = get(
        "/api/heatmap?contract=Acme&start=2024-10-01&end=2024-10-31&trigger=click&hour=14&weekday=Wednesday",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["highlight"],
        serde_json::json!({"hour": "14", "weekday": "Wednesday"})
    );

    let annotation = cell(&body, "14", "Wednesday");
    assert_eq!(annotation["font"]["color"], "#ff6347");
    assert_eq!(annotation["font"]["size"], 15);

    let shapes = body["figure"]["layout"]["shapes"].as_array().unwrap();
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0]["xref"], "paper");
}

#[tokio::test]
async fn test_reset_and_filter_change_clear_highlight() {
    for trigger in ["reset", "contract", "date"] {
        let uri = format!(
            "/api/heatmap?contract=Acme&trigger={}&hour=14&weekday=Wednesday",
            trigger
        );
        let (status, body) = get(&uri).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["highlight"].is_null(), "trigger {}", trigger);
        assert_eq!(body["figure"]["layout"]["shapes"], serde_json::json!([]));
    }
}

#[tokio::test]
async fn test_unknown_contract_and_empty_window_are_zero() {
    let (status, body) = get("/api/heatmap?contract=Nobody").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["session_hours"], 0);

    let (status, body) =
        get("/api/heatmap?contract=Acme&start=2024-10-31&end=2024-10-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["sessions"], 0);
    let rows = body["figure"]["data"][0]["z"].as_array().unwrap();
    assert_eq!(rows.len(), 7);
    assert!(rows
        .iter()
        .all(|row| row.as_array().unwrap().iter().all(|v| v == 0)));
}

#[tokio::test]
async fn test_bad_input_is_rejected() {
    for uri in [
        "/api/heatmap?start=10/01/2024",
        "/api/heatmap?end=2024-10-31garbage",
        "/api/heatmap?trigger=click&hour=24&weekday=Monday",
        "/api/heatmap?trigger=click&hour=09&weekday=Mon",
        "/api/heatmap?trigger=click",
        "/api/heatmap?trigger=hover",
        "/api/heatmap?hour=09",
    ] {
        let (status, body) = get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].is_string(), "{}", uri);
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["sessions"], 3);
    assert_eq!(body["contracts"], 2);
    assert_eq!(body["timezone"], "America/New_York");
}
