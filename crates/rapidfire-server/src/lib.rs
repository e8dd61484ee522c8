pub mod api;
pub mod config;
pub mod error;
pub mod state;

use axum::Router;
use tower_http::services::ServeDir;

use config::ServerConfig;
use state::AppState;

/// Build the Axum router from a config: the catalog endpoint plus static
/// serving of every game's files under `/games/{name}/...`.
pub fn build_app(config: &ServerConfig) -> Router<()> {
    let state = AppState::new(&config.games_root);
    Router::new()
        .route("/api/games", axum::routing::get(api::list_games))
        .nest_service("/games", ServeDir::new(&config.games_root))
        .with_state(state)
}
