use std::{net::SocketAddr, sync::Arc};

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use server_api::{fetch_score, update_score, ApiContext};
use shared::{
    error::{ApiError, ApiException, ErrorCode},
    protocol::ScoreResponse,
};
use storage::Storage;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

mod config;

use config::{load_settings, prepare_database_url};

#[derive(Clone)]
struct AppState {
    api: ApiContext,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;
    let api = ApiContext { storage };

    let state = AppState { api };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/score", get(http_fetch_score).put(http_update_score))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_fetch_score(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ScoreResponse>, (StatusCode, Json<ApiError>)> {
    let score = fetch_score(&state.api)
        .await
        .map_err(|e| error_response(e, "Failed to fetch score", "Score not found"))?;
    Ok(Json(score))
}

async fn http_update_score(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<ScoreResponse>, (StatusCode, Json<ApiError>)> {
    // Anything but a JSON integer is rejected before touching the store.
    let Some(new_score) = body.get("newScore").and_then(serde_json::Value::as_i64) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new("Invalid score value provided.")),
        ));
    };

    let score = update_score(&state.api, new_score).await.map_err(|e| {
        error_response(
            e,
            "Failed to update score",
            "Score record not found to update.",
        )
    })?;
    Ok(Json(score))
}

/// Maps a service failure onto the per-endpoint wire messages. The underlying
/// cause is logged here; callers never see storage detail.
fn error_response(
    exception: ApiException,
    internal_message: &str,
    not_found_message: &str,
) -> (StatusCode, Json<ApiError>) {
    match exception.code {
        ErrorCode::NotFound => (
            StatusCode::NOT_FOUND,
            Json(ApiError::new(not_found_message)),
        ),
        ErrorCode::Validation => (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(exception.message)),
        ),
        ErrorCode::Internal => {
            error!(%exception, "score request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new(internal_message)),
            )
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
