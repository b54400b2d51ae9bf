//! Web router using Axum

use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use chargeboard_core::analytics::{parse_date, DateWindow, HeatmapQuery, HeatmapSummary};
use chargeboard_core::config::DateBounds;
use chargeboard_core::{CellRef, ContractOverview, DataStore, HeatmapFigure, Trigger};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

use crate::error::ApiError;
use crate::page::render_index;

/// Create the web router
pub fn create_router(store: Arc<DataStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/contracts", get(contracts_handler))
        .route("/api/contracts/{name}/chargers", get(chargers_handler))
        .route("/api/heatmap", get(heatmap_handler))
        .route("/api/health", get(health_handler))
        .layer(cors)
        .with_state(store)
}

async fn index_handler(State(store): State<Arc<DataStore>>) -> Html<String> {
    Html(render_index(store.config()))
}

#[derive(Debug, Serialize)]
struct ContractsResponse {
    title: String,
    contracts: Vec<String>,
    default_contract: Option<String>,
    overview: Vec<ContractOverview>,
    dates: DateBounds,
}

async fn contracts_handler(State(store): State<Arc<DataStore>>) -> Json<ContractsResponse> {
    Json(ContractsResponse {
        title: store.config().title.clone(),
        contracts: store.contracts().to_vec(),
        default_contract: store.default_contract().map(str::to_string),
        overview: store.contract_overviews(),
        dates: store.config().dates,
    })
}

async fn chargers_handler(
    State(store): State<Arc<DataStore>>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let chargers = store
        .chargers_for(&name)
        .ok_or_else(|| ApiError::not_found(format!("unknown contract: {}", name)))?;
    Ok(Json(json!({
        "contract": name,
        "chargers": chargers,
    })))
}

/// Query string of `/api/heatmap`; everything optional
#[derive(Debug, Default, Deserialize)]
pub struct HeatmapParams {
    pub contract: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    /// Control that fired: `initial`, `contract`, `date`, `click`, `reset`
    pub trigger: Option<String>,
    /// Clicked cell, as the chart labels it
    pub hour: Option<String>,
    pub weekday: Option<String>,
}

#[derive(Debug, Serialize)]
struct HeatmapResponse {
    contract: String,
    start: NaiveDate,
    end: NaiveDate,
    highlight: Option<CellRef>,
    summary: HeatmapSummary,
    figure: HeatmapFigure,
}

async fn heatmap_handler(
    State(store): State<Arc<DataStore>>,
    Query(params): Query<HeatmapParams>,
) -> Result<Json<HeatmapResponse>, ApiError> {
    let dates = store.config().dates;
    let start = date_or(params.start.as_deref(), dates.default_start)?;
    let end = date_or(params.end.as_deref(), dates.default_end)?;

    let cell = match (non_empty(params.hour.as_deref()), non_empty(params.weekday.as_deref())) {
        (Some(hour), Some(weekday)) => Some(CellRef::from_labels(hour, weekday)?),
        (None, None) => None,
        _ => {
            return Err(ApiError::bad_request(
                "hour and weekday must be given together",
            ))
        }
    };
    let trigger = Trigger::parse(params.trigger.as_deref(), cell)?;
    let highlight = trigger.highlight();

    let contract = non_empty(params.contract.as_deref())
        .or(store.default_contract())
        .unwrap_or_default()
        .to_string();

    let query = HeatmapQuery::new(contract, DateWindow::from_dates(start, end, store.tz()));
    let (matrix, summary) = store.heatmap(&query);
    debug!(
        contract = %query.contract,
        %start,
        %end,
        trigger = ?trigger,
        "Heatmap request"
    );

    Ok(Json(HeatmapResponse {
        figure: HeatmapFigure::build(&matrix, highlight),
        contract: query.contract,
        start,
        end,
        highlight,
        summary,
    }))
}

async fn health_handler(State(store): State<Arc<DataStore>>) -> Json<serde_json::Value> {
    let status = if store.session_count() > 0 {
        "healthy"
    } else {
        "empty"
    };
    Json(json!({
        "status": status,
        "sessions": store.session_count(),
        "contracts": store.contracts().len(),
        "timezone": store.config().timezone,
    }))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn date_or(value: Option<&str>, default: NaiveDate) -> Result<NaiveDate, ApiError> {
    match non_empty(value) {
        Some(v) => Ok(parse_date(v)?),
        None => Ok(default),
    }
}
