use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod emotion;
pub mod handlers;
pub mod repo;

/// Number of mood entries retained per user; older ones are pruned eagerly
/// after every mutation.
pub const RETENTION_CAP: i64 = 10;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
