use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    history::dto::{AppendEntryRequest, HistoryQuery, ImportRequest, ImportResponse},
    history::repo::MoodEntry,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/history/:user_id", get(fetch_history))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/history/:user_id", post(append_entry))
        .route("/history/:user_id/import", post(import_entries))
}

/// Every history route acts on the authenticated user's own log.
fn require_owner(token_user: Uuid, path_user: Uuid) -> Result<(), ApiError> {
    if token_user != path_user {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn fetch_history(
    State(state): State<AppState>,
    AuthUser(auth_id): AuthUser,
    Path(user_id): Path<Uuid>,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<Vec<MoodEntry>>, ApiError> {
    require_owner(auth_id, user_id)?;

    let entries = MoodEntry::list_recent(&state.db, user_id, q.effective_limit()).await?;
    Ok(Json(entries))
}

#[instrument(skip(state, payload))]
pub async fn append_entry(
    State(state): State<AppState>,
    AuthUser(auth_id): AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<AppendEntryRequest>,
) -> Result<(StatusCode, Json<MoodEntry>), ApiError> {
    require_owner(auth_id, user_id)?;

    let emotion = payload
        .emotion
        .ok_or_else(|| ApiError::validation("emotion is required"))?;

    let entry = MoodEntry::insert(&state.db, user_id, emotion, payload.timestamp).await?;
    let pruned = MoodEntry::prune_to_cap(&state.db, user_id).await?;

    if pruned > 0 {
        debug!(user_id = %user_id, pruned, "retention cap pruned old entries");
    }
    info!(user_id = %user_id, emotion = %emotion, "mood entry appended");
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state, payload))]
pub async fn import_entries(
    State(state): State<AppState>,
    AuthUser(auth_id): AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, ApiError> {
    require_owner(auth_id, user_id)?;

    let well_formed = payload.well_formed();

    if well_formed.is_empty() {
        return Ok(Json(ImportResponse { inserted: vec![] }));
    }

    let inserted = MoodEntry::insert_many(&state.db, user_id, &well_formed).await?;
    let pruned = MoodEntry::prune_to_cap(&state.db, user_id).await?;

    info!(
        user_id = %user_id,
        inserted = inserted.len(),
        pruned,
        "guest history imported"
    );
    Ok(Json(ImportResponse { inserted }))
}
