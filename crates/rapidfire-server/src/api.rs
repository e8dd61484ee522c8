use axum::extract::State;
use axum::response::Json;

use rapidfire_core::manifest::GameDescriptor;
use rapidfire_engine::store::GameStore;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/games — list every game with a parseable manifest. Broken
/// game directories are skipped by the store, not surfaced as errors.
pub async fn list_games(
    State(state): State<AppState>,
) -> Result<Json<Vec<GameDescriptor>>, AppError> {
    let games = state
        .store
        .fetch_catalog()
        .await
        .map_err(|e| AppError::Internal(format!("failed to list games: {e}")))?;
    Ok(Json(games))
}
