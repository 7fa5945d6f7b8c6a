use serde::{Deserialize, Serialize};

use crate::meals::repo_types::Meal;
use crate::meals::writer::SyncSummary;

#[derive(Debug, Serialize)]
pub struct MealsResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: Vec<Meal>,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(flatten)]
    pub summary: SyncSummary,
}

#[derive(Debug, Deserialize)]
pub struct MealsQuery {
    /// `YYYY-MM-DD`; only meals on or after this day.
    pub from: Option<String>,
}
