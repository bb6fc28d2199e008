use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::http::{HeaderValue, StatusCode, header};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_test::{TestResponse, TestServer};
use metamoviex_metadata::MetadataError;
use metamoviex_metadata::provider::{IdentityApi, MediaApi, Upstream, Verb};
use metamoviex_server::config::Config;
use metamoviex_server::routes::build_router;
use metamoviex_server::state::AppState;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq)]
struct Call {
    verb: Verb,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

/// In-process TMDB: canned content by path and a scripted identity API.
/// Every call is recorded.
#[derive(Default)]
struct FakeTmdb {
    content: HashMap<String, Value>,
    failing: HashSet<String>,
    unreachable: bool,
    refuse_delete: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeTmdb {
    fn with_content(mut self, path: &str, body: Value) -> Self {
        self.content.insert(path.to_string(), body);
        self
    }

    fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    fn record(&self, verb: Verb, path: &str, query: &[(&str, String)], body: Option<Value>) {
        self.calls.lock().unwrap().push(Call {
            verb,
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            body,
        });
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MediaApi for FakeTmdb {
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value, MetadataError> {
        self.record(Verb::Get, path, params, None);
        if self.failing.contains(path) {
            return Err(MetadataError::Provider("TMDB returned 500".to_string()));
        }
        self.content.get(path).cloned().ok_or(MetadataError::NotFound)
    }
}

fn reply(status: u16, body: Value) -> Upstream {
    Upstream { status, body }
}

#[async_trait::async_trait]
impl IdentityApi for FakeTmdb {
    async fn send(
        &self,
        verb: Verb,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Upstream, MetadataError> {
        self.record(verb, path, query, body.clone());
        if self.unreachable {
            return Err(MetadataError::Network("connection refused".to_string()));
        }
        let field = |name: &str| {
            body.as_ref()
                .and_then(|b| b[name].as_str())
                .map(str::to_string)
        };
        let upstream = match (verb, path) {
            (Verb::Get, "/authentication/token/new") => reply(
                200,
                json!({
                    "success": true,
                    "expires_at": "2025-03-14 18:00:00 UTC",
                    "request_token": "tok123"
                }),
            ),
            (Verb::Post, "/authentication/session/new") => {
                if field("request_token").as_deref() == Some("tok123") {
                    reply(200, json!({ "success": true, "session_id": "abc" }))
                } else {
                    reply(
                        401,
                        json!({
                            "success": false,
                            "status_code": 17,
                            "status_message": "Session denied."
                        }),
                    )
                }
            }
            (Verb::Get, "/account") => {
                let session = query.iter().find(|(k, _)| *k == "session_id");
                if session.map(|(_, v)| v.as_str()) == Some("abc") {
                    reply(
                        200,
                        json!({
                            "id": 548,
                            "username": "moviebuff",
                            "name": "Movie Buff",
                            "include_adult": false,
                            "iso_639_1": "en",
                            "iso_3166_1": "US",
                            "avatar": { "tmdb": { "avatar_path": null } }
                        }),
                    )
                } else {
                    reply(
                        401,
                        json!({
                            "success": false,
                            "status_code": 3,
                            "status_message": "Authentication failed: You do not have permissions to access the service."
                        }),
                    )
                }
            }
            (Verb::Delete, "/authentication/session") => {
                if self.refuse_delete {
                    reply(200, json!({ "success": false }))
                } else {
                    reply(200, json!({ "success": true }))
                }
            }
            _ => reply(404, json!({ "success": false, "status_code": 34 })),
        };
        Ok(upstream)
    }
}

fn server_with(tmdb: Arc<FakeTmdb>, config: Config) -> TestServer {
    TestServer::new(build_router(AppState::new(tmdb, config))).unwrap()
}

fn server(tmdb: Arc<FakeTmdb>) -> TestServer {
    server_with(tmdb, Config::for_tests())
}

fn session_header() -> HeaderValue {
    "tmdb_session=abc".parse::<HeaderValue>().unwrap()
}

fn set_cookies(resp: &TestResponse) -> Vec<Cookie<'static>> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| Cookie::parse(v.to_str().unwrap().to_string()).unwrap())
        .collect()
}

fn movie_fixture() -> FakeTmdb {
    FakeTmdb::default()
        .with_content(
            "/movie/550",
            json!({
                "id": 550,
                "title": "Fight Club",
                "release_date": "1999-10-15",
                "runtime": 139,
                "vote_average": 8.4,
                "genres": [{ "id": 18, "name": "Drama" }]
            }),
        )
        .with_content(
            "/movie/550/credits",
            json!({
                "cast": [{ "id": 819, "name": "Edward Norton", "character": "Narrator" }],
                "crew": [{ "id": 7467, "name": "David Fincher", "job": "Director" }]
            }),
        )
        .with_content("/movie/550/videos", json!({ "results": [] }))
        .with_content("/movie/550/images", json!({}))
        .with_content("/movie/550/release_dates", json!({ "results": [] }))
        .with_content("/movie/550/watch/providers", json!({ "results": {} }))
        .with_content("/movie/550/recommendations", json!({ "page": 1, "results": [] }))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let server = server(Arc::new(FakeTmdb::default()));
    let resp = server.get("/health").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["status"], "ok");
}

// ---------------------------------------------------------------------------
// Session bridge
// ---------------------------------------------------------------------------

#[tokio::test]
async fn request_token_echoes_upstream_payload() {
    let tmdb = Arc::new(FakeTmdb::default());
    let server = server(tmdb.clone());

    let resp = server.get("/api/auth/request-token").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(
        body,
        json!({
            "success": true,
            "expires_at": "2025-03-14 18:00:00 UTC",
            "request_token": "tok123"
        })
    );
    assert_eq!(tmdb.calls().len(), 1);
    assert_eq!(tmdb.calls()[0].path, "/authentication/token/new");
}

#[tokio::test]
async fn create_session_without_token_is_rejected_locally() {
    let tmdb = Arc::new(FakeTmdb::default());
    let server = server(tmdb.clone());

    for path in ["/api/auth/create-session", "/api/auth/create-session?token="] {
        let resp = server.get(path).await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = resp.json();
        assert_eq!(body["error"]["code"], "bad_request");
        assert!(
            body["error"]["message"]
                .as_str()
                .unwrap()
                .contains("Missing request token")
        );
        assert!(set_cookies(&resp).is_empty());
    }
    assert!(tmdb.calls().is_empty());
}

#[tokio::test]
async fn create_session_sets_session_cookie() {
    let tmdb = Arc::new(FakeTmdb::default());
    let server = server(tmdb.clone());

    let resp = server.get("/api/auth/create-session?token=tok123").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body, json!({ "success": true, "session_id": "abc" }));

    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 1);
    let cookie = &cookies[0];
    assert_eq!(cookie.name(), "tmdb_session");
    assert_eq!(cookie.value(), "abc");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age().map(|d| d.whole_seconds()), Some(604_800));
    assert_ne!(cookie.secure(), Some(true));

    let calls = tmdb.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].verb, Verb::Post);
    assert_eq!(calls[0].path, "/authentication/session/new");
    assert_eq!(calls[0].body, Some(json!({ "request_token": "tok123" })));
}

#[tokio::test]
async fn session_cookie_is_secure_in_production() {
    let config = Config {
        production: true,
        ..Config::for_tests()
    };
    let server = server_with(Arc::new(FakeTmdb::default()), config);

    let resp = server.get("/api/auth/create-session?token=tok123").await;
    resp.assert_status_ok();
    assert_eq!(set_cookies(&resp)[0].secure(), Some(true));
}

#[tokio::test]
async fn denied_session_passes_status_through_without_cookie() {
    let server = server(Arc::new(FakeTmdb::default()));

    let resp = server.get("/api/auth/create-session?token=unapproved").await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = resp.json();
    assert_eq!(body["status_code"], 17);
    assert_eq!(body["status_message"], "Session denied.");
    assert!(set_cookies(&resp).is_empty());
}

#[tokio::test]
async fn login_user_without_cookie_is_unauthorized() {
    let tmdb = Arc::new(FakeTmdb::default());
    let server = server(tmdb.clone());

    let resp = server.get("/api/auth/login-user").await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "unauthorized");
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("No session found")
    );
    assert!(tmdb.calls().is_empty());
}

#[tokio::test]
async fn login_user_forwards_cookie_session() {
    let tmdb = Arc::new(FakeTmdb::default());
    let server = server(tmdb.clone());

    let resp = server
        .get("/api/auth/login-user")
        .add_header(header::COOKIE, session_header())
        .await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["id"], 548);
    assert_eq!(body["username"], "moviebuff");

    let calls = tmdb.calls();
    assert_eq!(calls[0].path, "/account");
    assert_eq!(
        calls[0].query,
        vec![("session_id".to_string(), "abc".to_string())]
    );
}

#[tokio::test]
async fn stale_session_passes_upstream_401_through() {
    let server = server(Arc::new(FakeTmdb::default()));
    let resp = server
        .get("/api/auth/login-user")
        .add_header(header::COOKIE, "tmdb_session=expired".parse::<HeaderValue>().unwrap())
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = resp.json();
    assert_eq!(body["status_code"], 3);
}

#[tokio::test]
async fn full_login_round_trip() {
    let tmdb = Arc::new(FakeTmdb::default());
    let server = server(tmdb.clone());

    let token: Value = server.get("/api/auth/request-token").await.json();
    let token = token["request_token"].as_str().unwrap().to_string();

    let resp = server
        .get(&format!("/api/auth/create-session?token={token}"))
        .await;
    resp.assert_status_ok();
    let cookie = set_cookies(&resp).remove(0);

    let resp = server
        .get("/api/auth/login-user")
        .add_header(
            header::COOKIE,
            format!("{}={}", cookie.name(), cookie.value())
                .parse::<HeaderValue>()
                .unwrap(),
        )
        .await;
    resp.assert_status_ok();
    let user: Value = resp.json();
    assert_eq!(user["id"], 548);

    let paths: Vec<_> = tmdb.calls().into_iter().map(|c| c.path).collect();
    assert_eq!(
        paths,
        vec![
            "/authentication/token/new",
            "/authentication/session/new",
            "/account"
        ]
    );
}

#[tokio::test]
async fn delete_session_without_cookie_is_rejected_locally() {
    let tmdb = Arc::new(FakeTmdb::default());
    let server = server(tmdb.clone());

    let resp = server.post("/api/auth/delete-session").await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("No active session found")
    );
    assert!(tmdb.calls().is_empty());
}

#[tokio::test]
async fn delete_session_clears_cookie_on_success() {
    let tmdb = Arc::new(FakeTmdb::default());
    let server = server(tmdb.clone());

    let resp = server
        .post("/api/auth/delete-session")
        .add_header(header::COOKIE, session_header())
        .await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body, json!({ "success": true }));

    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 1);
    assert_eq!(cookies[0].name(), "tmdb_session");
    assert_eq!(cookies[0].value(), "");
    assert_eq!(cookies[0].path(), Some("/"));
    assert_eq!(cookies[0].max_age().map(|d| d.whole_seconds()), Some(0));

    let calls = tmdb.calls();
    assert_eq!(calls[0].verb, Verb::Delete);
    assert_eq!(calls[0].body, Some(json!({ "session_id": "abc" })));
}

#[tokio::test]
async fn refused_delete_keeps_cookie() {
    let tmdb = Arc::new(FakeTmdb {
        refuse_delete: true,
        ..Default::default()
    });
    let server = server(tmdb);

    let resp = server
        .post("/api/auth/delete-session")
        .add_header(header::COOKIE, session_header())
        .await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["success"], false);
    assert!(set_cookies(&resp).is_empty());
}

#[tokio::test]
async fn unreachable_tmdb_is_bad_gateway() {
    let tmdb = Arc::new(FakeTmdb {
        unreachable: true,
        ..Default::default()
    });
    let server = server(tmdb);

    let resp = server.get("/api/auth/request-token").await;
    resp.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "upstream_error");

    let resp = server.get("/api/auth/create-session?token=tok123").await;
    resp.assert_status(StatusCode::BAD_GATEWAY);
    assert!(set_cookies(&resp).is_empty());
}

// ---------------------------------------------------------------------------
// Detail pages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn movie_page_joins_all_sub_resources() {
    let tmdb = Arc::new(movie_fixture());
    let server = server(tmdb.clone());

    let resp = server.get("/api/movie/550").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["id"], 550);
    assert_eq!(body["title"], "Fight Club");
    assert_eq!(body["runtime"], "2h 19m");

    let mut paths: Vec<_> = tmdb.calls().into_iter().map(|c| c.path).collect();
    paths.sort();
    assert_eq!(
        paths,
        vec![
            "/movie/550",
            "/movie/550/credits",
            "/movie/550/images",
            "/movie/550/recommendations",
            "/movie/550/release_dates",
            "/movie/550/videos",
            "/movie/550/watch/providers",
        ]
    );
}

#[tokio::test]
async fn movie_page_fails_when_any_part_fails() {
    let tmdb = Arc::new(movie_fixture().failing("/movie/550/images"));
    let server = server(tmdb);

    let resp = server.get("/api/movie/550").await;
    resp.assert_status(StatusCode::NOT_FOUND);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn unknown_movie_is_not_found() {
    let server = server(Arc::new(movie_fixture()));
    let resp = server.get("/api/movie/551").await;
    resp.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_not_found_without_upstream_calls() {
    let tmdb = Arc::new(movie_fixture());
    let server = server(tmdb.clone());

    for path in ["/api/movie/abc", "/api/tv/-1", "/api/person/1.5"] {
        let resp = server.get(path).await;
        resp.assert_status(StatusCode::NOT_FOUND);
    }
    assert!(tmdb.calls().is_empty());
}

#[tokio::test]
async fn tv_page_renders() {
    let tmdb = FakeTmdb::default()
        .with_content(
            "/tv/1396",
            json!({
                "id": 1396,
                "name": "Breaking Bad",
                "first_air_date": "2008-01-20",
                "last_air_date": "2013-09-29",
                "episode_run_time": [45],
                "number_of_seasons": 5,
                "created_by": [{ "id": 66633, "name": "Vince Gilligan" }]
            }),
        )
        .with_content("/tv/1396/credits", json!({}))
        .with_content("/tv/1396/videos", json!({}))
        .with_content("/tv/1396/images", json!({}))
        .with_content("/tv/1396/watch/providers", json!({}))
        .with_content("/tv/1396/recommendations", json!({}))
        .with_content("/tv/1396/similar", json!({}));
    let server = server(Arc::new(tmdb));

    let resp = server.get("/api/tv/1396").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["name"], "Breaking Bad");
    assert_eq!(body["air_dates"], "2008–2013");
    assert_eq!(body["creators"], "Vince Gilligan");
}

#[tokio::test]
async fn person_page_renders() {
    let tmdb = FakeTmdb::default()
        .with_content(
            "/person/287",
            json!({
                "id": 287,
                "name": "Brad Pitt",
                "gender": 2,
                "birthday": "1963-12-18",
                "known_for_department": "Acting"
            }),
        )
        .with_content(
            "/person/287/combined_credits",
            json!({
                "cast": [
                    { "id": 550, "title": "Fight Club", "release_date": "1999-10-15", "character": "Tyler Durden", "media_type": "movie" }
                ],
                "crew": []
            }),
        );
    let server = server(Arc::new(tmdb));

    let resp = server.get("/api/person/287").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["name"], "Brad Pitt");
    assert_eq!(body["gender"], "Male");
    assert_eq!(body["known_credits"], 1);
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn leaderboard_ranks_by_timeframe() {
    let server = server(Arc::new(FakeTmdb::default()));

    let resp = server.get("/api/leaderboard?timeframe=this_week").await;
    resp.assert_status_ok();
    let weekly: Vec<Value> = resp.json();
    assert_eq!(weekly.len(), 10);
    assert_eq!(weekly[0]["username"], "enterpr1se");
    let edits: Vec<u64> = weekly
        .iter()
        .map(|c| c["weekly_edits"].as_u64().unwrap())
        .collect();
    assert!(edits.windows(2).all(|w| w[0] >= w[1]));

    let resp = server.get("/api/leaderboard?timeframe=all_time").await;
    let all_time: Vec<Value> = resp.json();
    assert_eq!(all_time[0]["username"], "Samara");

    let resp = server.get("/api/leaderboard").await;
    let default: Vec<Value> = resp.json();
    assert_eq!(default, all_time);
}

#[tokio::test]
async fn leaderboard_rejects_unknown_timeframe() {
    let server = server(Arc::new(FakeTmdb::default()));
    let resp = server.get("/api/leaderboard?timeframe=forever").await;
    resp.assert_status(StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// CORS
// ---------------------------------------------------------------------------

#[tokio::test]
async fn configured_origin_gets_credentialed_cors() {
    let config = Config {
        cors_origin: Some("http://localhost:5173".to_string()),
        ..Config::for_tests()
    };
    let server = server_with(Arc::new(FakeTmdb::default()), config);

    let resp = server
        .get("/health")
        .add_header(
            header::ORIGIN,
            "http://localhost:5173".parse::<HeaderValue>().unwrap(),
        )
        .await;
    resp.assert_status_ok();
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}
