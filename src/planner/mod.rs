pub mod assign;
mod dto;
mod handlers;
pub mod schedule;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::plan_routes()
}
