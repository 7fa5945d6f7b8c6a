use axum::{
    extract::{Query, State},
    http::Method,
    routing::get,
    Json, Router,
};
use time::{macros::format_description, Date};
use tracing::{error, info, instrument};

use super::dto::{MealsQuery, MealsResponse, SyncResponse};
use super::services::{run_sync, SyncResult};
use super::writer::SyncSummary;
use crate::{config::EmptyRunPolicy, error::ApiError, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/obedy", get(list_meals))
}

pub fn sync_routes() -> Router<AppState> {
    Router::new().route("/sync", get(trigger_sync).post(trigger_sync))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    Query(q): Query<MealsQuery>,
) -> Result<Json<MealsResponse>, ApiError> {
    let from = q.from.as_deref().map(parse_iso_date).transpose()?;

    let meals = state.meals.list(from).await.map_err(|e| {
        error!(error = %format!("{e:#}"), "list meals failed");
        ApiError::Database(e.to_string())
    })?;

    Ok(Json(MealsResponse {
        success: true,
        message: "Meals successfully retrieved from database",
        data: meals,
    }))
}

#[instrument(skip(state))]
pub async fn trigger_sync(
    method: Method,
    State(state): State<AppState>,
) -> Result<Json<SyncResponse>, ApiError> {
    info!(%method, "processing sync request");
    let result = run_sync(&state).await;
    sync_response(result, state.config.sync.empty_run).map(Json)
}

fn sync_response(result: SyncResult, policy: EmptyRunPolicy) -> Result<SyncResponse, ApiError> {
    let success = result.is_success(policy);
    match result {
        SyncResult::FetchFailed(e) => Err(ApiError::Upstream {
            error: "Failed to fetch meals from source",
            details: Some(match e.details() {
                Some(details) => format!("{e}: {details}"),
                None => e.to_string(),
            }),
        }),
        SyncResult::NoData if success => Ok(SyncResponse {
            success,
            message: "No valid meals found in the API response",
            summary: SyncSummary::default(),
        }),
        SyncResult::NoData => Err(ApiError::Upstream {
            error: "No valid meals found in the API response",
            details: None,
        }),
        SyncResult::NoValidRecords { .. } if success => Ok(SyncResponse {
            success,
            message: "No valid meals found to insert",
            summary: SyncSummary::default(),
        }),
        SyncResult::NoValidRecords { raw } => Err(ApiError::Upstream {
            error: "No valid meals found to insert",
            details: Some(format!("{raw} records failed validation")),
        }),
        SyncResult::Completed(summary) => Ok(SyncResponse {
            success,
            message: "Meals fetched and saved successfully",
            summary,
        }),
    }
}

fn parse_iso_date(s: &str) -> Result<Date, ApiError> {
    Date::parse(s, format_description!("[year]-[month]-[day]"))
        .map_err(|_| ApiError::BadRequest(format!("Invalid date: {s}, expected YYYY-MM-DD")))
}
