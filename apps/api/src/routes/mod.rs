pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Own assets win over the separate front-end bundle.
    let assets = ServeDir::new(&state.config.static_dir)
        .fallback(ServeDir::new(&state.config.frontend_dir));
    let index = ServeFile::new(&state.config.index_file);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/ask", post(handlers::handle_ask))
        .route_service("/", index)
        .fallback_service(assets)
        .with_state(state)
}
