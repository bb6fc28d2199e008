use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use metamoviex_core::error::ApiError;
use metamoviex_core::types::{Contributor, Timeframe};
use metamoviex_metadata::MetadataError;
use metamoviex_metadata::detail::{self, MoviePage, PersonPage, TvPage};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::error::AppError;
use crate::leaderboard;
use crate::session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = state.config.cors_origin.as_deref().and_then(cors_layer);

    let router = Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_router())
        .route("/movie/{id}", get(movie_page))
        .route("/tv/{id}", get(tv_page))
        .route("/person/{id}", get(person_page))
        .route("/leaderboard", get(get_leaderboard))
}

fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/request-token", get(session::request_token))
        .route("/create-session", get(session::create_session))
        .route("/login-user", get(session::login_user))
        .route("/delete-session", post(session::delete_session))
}

/// Credentialed CORS for a single separately-hosted front end.
fn cors_layer(origin: &str) -> Option<CorsLayer> {
    match HeaderValue::from_str(origin) {
        Ok(origin) => Some(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
                .allow_credentials(true),
        ),
        Err(_) => {
            warn!(origin, "ignoring invalid CORS origin");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ---------------------------------------------------------------------------
// Detail pages
// ---------------------------------------------------------------------------

/// Any failure loading a detail page is reported as a missing page.
fn page_not_found(kind: &str, raw_id: &str, err: Option<MetadataError>) -> AppError {
    match err {
        Some(e) => warn!(kind, id = raw_id, error = %e, "detail page failed to load"),
        None => warn!(kind, id = raw_id, "invalid detail id"),
    }
    AppError(ApiError::NotFound(format!("{kind} not found")))
}

fn parse_id(kind: &str, raw: &str) -> Result<u64, AppError> {
    raw.parse::<u64>()
        .map_err(|_| page_not_found(kind, raw, None))
}

async fn movie_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MoviePage>, AppError> {
    let movie_id = parse_id("movie", &id)?;
    detail::load_movie_page(state.media.as_ref(), movie_id)
        .await
        .map(Json)
        .map_err(|e| page_not_found("movie", &id, Some(e)))
}

async fn tv_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TvPage>, AppError> {
    let tv_id = parse_id("tv show", &id)?;
    detail::load_tv_page(state.media.as_ref(), tv_id)
        .await
        .map(Json)
        .map_err(|e| page_not_found("tv show", &id, Some(e)))
}

async fn person_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PersonPage>, AppError> {
    let person_id = parse_id("person", &id)?;
    detail::load_person_page(state.media.as_ref(), person_id)
        .await
        .map(Json)
        .map_err(|e| page_not_found("person", &id, Some(e)))
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct LeaderboardQuery {
    timeframe: Option<String>,
}

async fn get_leaderboard(
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<Contributor>>, AppError> {
    let timeframe = match query.timeframe.as_deref() {
        None | Some("") => Timeframe::AllTime,
        Some(raw) => leaderboard::parse_timeframe(raw)
            .ok_or_else(|| ApiError::BadRequest(format!("unknown timeframe '{raw}'")))?,
    };
    Ok(Json(leaderboard::top(leaderboard::contributors(), timeframe)))
}
