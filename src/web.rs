//! HTTP API for the PokeTrack frontend
//!
//! Card search, mock price history and watchlist endpoints.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode},
    response::Json,
    routing::{delete, get},
    Router,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::catalog::{Card, Catalog};
use crate::config::ServerConfig;
use crate::error::{PokeTrackError, Result};
use crate::price_history::{generate_today, PriceHistory, DEFAULT_DAYS};
use crate::watchlist::{self, DbResult, WatchlistEntry};

/// Shared application state (database connection + read-only catalog)
#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Connection>>,
    catalog: Arc<Catalog>,
    max_days: usize,
}

impl AppState {
    /// Run one store operation while holding the connection lock
    fn with_db<T>(&self, op: impl FnOnce(&Connection) -> DbResult<T>) -> Result<T> {
        let conn = self.db.lock().map_err(|_| PokeTrackError::LockPoisoned)?;
        Ok(op(&conn)?)
    }
}

fn internal_error(context: &str, err: PokeTrackError) -> StatusCode {
    log::error!("{}: {}", context, err);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Search query parameters
#[derive(Deserialize)]
struct SearchParams {
    q: String,
}

/// Price history query parameters
#[derive(Deserialize)]
struct PriceHistoryParams {
    #[serde(default = "default_days")]
    days: usize,
}

fn default_days() -> usize {
    DEFAULT_DAYS
}

/// POST /watchlist body
#[derive(Deserialize)]
struct AddWatchlistRequest {
    card_name: String,
}

#[derive(Serialize)]
struct SearchResponse {
    query: String,
    results: Vec<Card>,
}

#[derive(Serialize)]
struct OkResponse {
    ok: bool,
}

#[derive(Serialize)]
struct StatusMessage {
    message: &'static str,
}

/// GET /
async fn index_handler() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: "PokeTrack API is running",
    })
}

/// GET /cards/search?q={query}
async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let results = state.catalog.search(&params.q);
    Json(SearchResponse {
        query: params.q,
        results,
    })
}

/// GET /cards/{card_name}/price-history?days={days}
async fn price_history_handler(
    State(state): State<AppState>,
    Path(card_name): Path<String>,
    Query(params): Query<PriceHistoryParams>,
) -> std::result::Result<Json<PriceHistory>, StatusCode> {
    if params.days > state.max_days {
        log::warn!(
            "Rejected price history request for '{}': {} days exceeds limit of {}",
            card_name,
            params.days,
            state.max_days
        );
        return Err(StatusCode::BAD_REQUEST);
    }

    Ok(Json(generate_today(&card_name, params.days)))
}

/// GET /watchlist
async fn list_watchlist_handler(
    State(state): State<AppState>,
) -> std::result::Result<Json<Vec<WatchlistEntry>>, StatusCode> {
    state
        .with_db(watchlist::list)
        .map(Json)
        .map_err(|e| internal_error("Failed to list watchlist", e))
}

/// POST /watchlist
async fn add_watchlist_handler(
    State(state): State<AppState>,
    Json(payload): Json<AddWatchlistRequest>,
) -> std::result::Result<(StatusCode, Json<OkResponse>), StatusCode> {
    state
        .with_db(|conn| watchlist::add(conn, &payload.card_name))
        .map_err(|e| internal_error("Failed to add to watchlist", e))?;

    Ok((StatusCode::CREATED, Json(OkResponse { ok: true })))
}

/// DELETE /watchlist/{card_name}
async fn remove_watchlist_handler(
    State(state): State<AppState>,
    Path(card_name): Path<String>,
) -> std::result::Result<Json<OkResponse>, StatusCode> {
    state
        .with_db(|conn| watchlist::remove(conn, &card_name))
        .map_err(|e| internal_error("Failed to remove from watchlist", e))?;

    Ok(Json(OkResponse { ok: true }))
}

/// CORS policy for the configured frontend origins
///
/// Credentials are allowed, so origins are listed explicitly and methods and
/// headers are mirrored from the preflight request instead of using `*`.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Build the web server router
pub fn create_router(
    db: Arc<Mutex<Connection>>,
    catalog: Arc<Catalog>,
    config: &ServerConfig,
) -> Router {
    let state = AppState {
        db,
        catalog,
        max_days: config.max_days,
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/cards/search", get(search_handler))
        .route("/cards/{card_name}/price-history", get(price_history_handler))
        .route(
            "/watchlist",
            get(list_watchlist_handler).post(add_watchlist_handler),
        )
        .route("/watchlist/{card_name}", delete(remove_watchlist_handler))
        .layer(cors_layer(&config.allowed_origins))
        .with_state(state)
}

/// Start the web server and run until Ctrl-C
pub async fn serve(
    db: Arc<Mutex<Connection>>,
    catalog: Arc<Catalog>,
    config: &ServerConfig,
) -> Result<()> {
    let app = create_router(db, catalog, config);

    log::info!("PokeTrack API listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
