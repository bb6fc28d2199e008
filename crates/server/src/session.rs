//! Session bridge: the only place the TMDB session id is seen.
//!
//! The browser holds the session id in an HTTP-only `tmdb_session` cookie;
//! these handlers read it and forward calls to TMDB. Upstream replies are
//! echoed with their status code and body unchanged.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use metamoviex_core::error::ApiError;
use metamoviex_metadata::models::{SessionCreated, StatusReply};
use metamoviex_metadata::provider::Upstream;
use serde::Deserialize;
use time::Duration;
use tracing::{info, warn};

use crate::error::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "tmdb_session";
pub const SESSION_TTL_DAYS: i64 = 7;

fn session_cookie(session_id: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::days(SESSION_TTL_DAYS))
        .build()
}

fn session_id(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

fn passthrough(upstream: Upstream) -> Response {
    let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
    (status, Json(upstream.body)).into_response()
}

/// `GET /api/auth/request-token`
pub async fn request_token(State(state): State<AppState>) -> Result<Response, AppError> {
    let upstream = state.identity.create_request_token().await?;
    if !upstream.is_success() {
        warn!(status = upstream.status, "request token refused");
    }
    Ok(passthrough(upstream))
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionQuery {
    pub token: Option<String>,
}

/// `GET /api/auth/create-session?token=…`
pub async fn create_session(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CreateSessionQuery>,
) -> Result<(CookieJar, Response), AppError> {
    let token = query
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing request token".into()))?;

    let upstream = state.identity.create_session(&token).await?;
    let mut jar = jar;
    if upstream.is_success() {
        let created: SessionCreated = upstream.decode("/authentication/session/new")?;
        match created.session_id {
            Some(id) if created.success && !id.is_empty() => {
                info!("tmdb session created");
                jar = jar.add(session_cookie(id, state.config.production));
            }
            _ => warn!("session reply carried no session id"),
        }
    } else {
        warn!(status = upstream.status, "session creation refused");
    }
    Ok((jar, passthrough(upstream)))
}

/// `GET /api/auth/login-user`
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let session_id =
        session_id(&jar).ok_or_else(|| ApiError::Unauthorized("No session found".into()))?;
    let upstream = state.identity.account(&session_id).await?;
    Ok(passthrough(upstream))
}

/// `POST /api/auth/delete-session`
pub async fn delete_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Response), AppError> {
    let session_id = session_id(&jar)
        .ok_or_else(|| ApiError::BadRequest("No active session found".into()))?;

    let upstream = state.identity.delete_session(&session_id).await?;
    let mut jar = jar;
    if upstream.is_success() {
        let reply: StatusReply = upstream.decode("/authentication/session")?;
        if reply.success {
            info!("tmdb session deleted");
            jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
        } else {
            warn!(message = ?reply.status_message, "session delete reported failure");
        }
    } else {
        warn!(status = upstream.status, "session delete refused");
    }
    Ok((jar, passthrough(upstream)))
}
