mod dto;
pub mod handlers;
mod normalize;
pub mod repo;
mod repo_types;
pub mod services;
mod transform;
mod writer;

use crate::state::AppState;
use axum::Router;

pub use repo::{MealStore, PgMealStore};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::sync_routes())
}
