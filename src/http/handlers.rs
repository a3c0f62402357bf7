//! Axum HTTP handlers for the dashboard API
//!
//! Read-only views over unit listings, per-unit status probes and journal entries.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    discovery::{journal::clamp_limit, JournalEntry, UnitRecord, UnitStatusResult},
    domain::utils::{
        filter_standard_units, filter_units_by_state, normalize_active_state, split_unit_names,
    },
    errors::AppError,
    systemd_client::JournalQuery,
    AppState,
};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: [&'static str; 3],
}

#[derive(Debug, Deserialize)]
pub struct ServicesQueryParams {
    pub state: Option<String>,
    pub include_standard: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct StatusQueryParams {
    pub units: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JournalQueryParams {
    pub unit: Option<String>,
    pub limit: Option<i64>,
    pub since: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ServicesResponse {
    pub services: Vec<UnitRecord>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub statuses: Vec<UnitStatusResult>,
}

#[derive(Debug, Serialize)]
pub struct JournalResponse {
    pub unit: String,
    pub limit: i64,
    pub entries: Vec<JournalEntry>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn discovery() -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: [
            "/api/systemd/services",
            "/api/systemd/status",
            "/api/systemd/journal",
        ],
    })
}

pub async fn list_services(
    State(state): State<AppState>,
    query: Result<Query<ServicesQueryParams>, QueryRejection>,
) -> Result<Json<ServicesResponse>, AppError> {
    let Query(params) = query?;
    let active_state = normalize_active_state(params.state)?;

    let units = state.unit_provider.list_units().await?;
    let units = filter_units_by_state(units, active_state.as_deref());
    let services = filter_standard_units(units, params.include_standard.unwrap_or(true));

    Ok(Json(ServicesResponse { services }))
}

pub async fn unit_status(
    State(state): State<AppState>,
    query: Result<Query<StatusQueryParams>, QueryRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let Query(params) = query?;
    let units = split_unit_names(params.units.as_deref())?;
    let statuses = state.unit_provider.status_for_units(units).await?;

    Ok(Json(StatusResponse { statuses }))
}

pub async fn journal(
    State(state): State<AppState>,
    query: Result<Query<JournalQueryParams>, QueryRejection>,
) -> Result<Json<JournalResponse>, AppError> {
    let Query(params) = query?;
    let query = JournalQuery {
        unit: params.unit.unwrap_or_default().trim().to_string(),
        limit: clamp_limit(params.limit.unwrap_or(state.default_journal_limit)),
        since: params.since.filter(|since| !since.is_empty()),
    };

    let entries = state.unit_provider.journal_entries(&query).await?;

    Ok(Json(JournalResponse {
        unit: query.unit,
        limit: query.limit,
        entries,
    }))
}
