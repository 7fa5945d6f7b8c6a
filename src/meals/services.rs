use tracing::{debug, error, info, instrument, warn};

use super::normalize::flatten;
use super::repo::MealStore;
use super::transform::transform;
use super::writer::{upsert_all, SyncSummary};
use crate::config::EmptyRunPolicy;
use crate::state::AppState;
use crate::upstream::{FetchError, MealSource};

/// How a sync run ended.
#[derive(Debug)]
pub enum SyncResult {
    FetchFailed(FetchError),
    /// The payload held no table rows.
    NoData,
    /// Rows were found but none passed validation.
    NoValidRecords { raw: usize },
    Completed(SyncSummary),
}

impl SyncResult {
    pub fn is_success(&self, policy: EmptyRunPolicy) -> bool {
        match self {
            SyncResult::FetchFailed(_) => false,
            SyncResult::NoData | SyncResult::NoValidRecords { .. } => {
                policy == EmptyRunPolicy::Success
            }
            SyncResult::Completed(_) => true,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SyncResult::FetchFailed(_) => "fetch_failed",
            SyncResult::NoData => "no_data",
            SyncResult::NoValidRecords { .. } => "no_valid_records",
            SyncResult::Completed(_) => "completed",
        }
    }
}

/// Run one sync with the state's upstream client and store.
pub async fn run_sync(state: &AppState) -> SyncResult {
    let result = sync_meals(state.upstream.as_ref(), state.meals.as_ref()).await;
    log_outcome(&result, state.config.sync.empty_run);
    result
}

/// One fetch, one flatten, one transform pass, one write pass.
#[instrument(skip_all)]
pub async fn sync_meals(source: &dyn MealSource, store: &dyn MealStore) -> SyncResult {
    let payload = match source.fetch_meals().await {
        Ok(payload) => payload,
        Err(e) => return SyncResult::FetchFailed(e),
    };

    let raw = flatten(&payload);
    if raw.is_empty() {
        return SyncResult::NoData;
    }

    let meals: Vec<_> = raw.iter().filter_map(transform).collect();
    let dropped = raw.len() - meals.len();
    if dropped > 0 {
        debug!(dropped, raw = raw.len(), "dropped invalid meal records");
    }
    if meals.is_empty() {
        return SyncResult::NoValidRecords { raw: raw.len() };
    }

    SyncResult::Completed(upsert_all(store, &meals).await)
}

fn log_outcome(result: &SyncResult, policy: EmptyRunPolicy) {
    match result {
        SyncResult::FetchFailed(e) => {
            error!(error = %e, details = ?e.details(), "meal sync failed to fetch")
        }
        SyncResult::NoData | SyncResult::NoValidRecords { .. } => {
            if result.is_success(policy) {
                warn!(outcome = result.label(), "meal sync stored nothing")
            } else {
                error!(outcome = result.label(), "meal sync stored nothing")
            }
        }
        SyncResult::Completed(summary) => info!(
            written = summary.written,
            total = summary.total,
            failed = summary.failed,
            "meal sync completed"
        ),
    }
}
