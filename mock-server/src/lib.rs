//! In-process stand-in for the Podcast Index API.
//!
//! Serves canned bodies under `/api/1.0`, checks the `Authorization`
//! digest on every API request, and records what it received so tests can
//! assert on hit counts and encoded queries. `POST /track` doubles as a
//! telemetry collector.

pub mod fixtures;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use sha1::{Digest, Sha1};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};

pub const API_PREFIX: &str = "/api/1.0";

/// One API request as the server saw it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecordedRequest {
    /// Path relative to `API_PREFIX`, e.g. `/search/byterm`.
    pub path: String,
    /// Raw query string, without the `?`.
    pub query: Option<String>,
    pub user_agent: Option<String>,
    pub authorized: bool,
}

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    api_secret: Arc<str>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
    events: Arc<RwLock<Vec<Value>>>,
}

impl AppState {
    pub fn new(api_key: &str, api_secret: &str) -> Self {
        Self {
            api_key: Arc::from(api_key),
            api_secret: Arc::from(api_secret),
            requests: Arc::default(),
            events: Arc::default(),
        }
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    pub async fn hits(&self, path: &str) -> usize {
        self.requests.read().await.iter().filter(|r| r.path == path).count()
    }

    /// Telemetry events posted to `/track`.
    pub async fn events(&self) -> Vec<Value> {
        self.events.read().await.clone()
    }

    fn expected_digest(&self, auth_date: &str) -> String {
        let mut hasher = Sha1::new();
        hasher.update(self.api_key.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hasher.update(auth_date.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn is_authorized(&self, headers: &HeaderMap) -> bool {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        let (Some(key), Some(date), Some(auth)) = (
            header("x-auth-key"),
            header("x-auth-date"),
            header("authorization"),
        ) else {
            return false;
        };
        key == &*self.api_key && auth == self.expected_digest(date)
    }
}

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/search/byterm", get(search))
        .route("/search/byperson", get(search_person))
        .route("/categories/list", get(categories))
        .route("/recent/episodes", get(recent_episodes))
        .route("/recent/feeds", get(recent_feeds))
        .route("/recent/newfeeds", get(recent_new_feeds))
        .route("/recent/soundbites", get(recent_soundbites))
        .route("/podcasts/byfeedurl", get(podcast_by_url))
        .route("/podcasts/byfeedid", get(podcast_by_id))
        .route("/podcasts/byitunesid", get(podcast_by_itunes_id))
        .route("/podcasts/trending", get(trending))
        .route("/episodes/byfeedurl", get(episodes_by_feed_url))
        .route("/episodes/byfeedid", get(episodes_by_feed_id))
        .route("/episodes/byitunesid", get(episodes_by_itunes_id))
        .route("/episodes/byid", get(episode_by_id))
        .route("/episodes/random", get(episodes_random))
        .route("/stats/current", get(stats))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .nest(API_PREFIX, api)
        .route("/track", post(track))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

/// Records the request, then rejects it with 401 unless the key and digest
/// match.
async fn authenticate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let path = path.strip_prefix(API_PREFIX).unwrap_or(path).to_string();
    let authorized = state.is_authorized(request.headers());
    let recorded = RecordedRequest {
        path,
        query: request.uri().query().map(str::to_string),
        user_agent: request
            .headers()
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        authorized,
    };
    debug!(path = %recorded.path, query = ?recorded.query, authorized, "api request");
    state.requests.write().await.push(recorded);

    if !authorized {
        warn!("rejected request with bad credentials");
        let body = Json(fixtures::failure("Authorization header doesn't match"));
        return (StatusCode::UNAUTHORIZED, body).into_response();
    }
    next.run(request).await
}

type Params = Query<HashMap<String, String>>;

fn bad_request(description: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(fixtures::failure(description))).into_response()
}

fn echo(params: &HashMap<String, String>) -> Value {
    json!(params)
}

fn param_i64(params: &HashMap<String, String>, key: &str) -> Option<i64> {
    params.get(key).and_then(|v| v.parse().ok())
}

fn param_u64(params: &HashMap<String, String>, key: &str) -> Option<u64> {
    params.get(key).and_then(|v| v.parse().ok())
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(fixtures::failure("Not found"))).into_response()
}

async fn search(Query(params): Params) -> Response {
    match params.get("q") {
        Some(q) if !q.is_empty() => Json(fixtures::search(q, echo(&params))).into_response(),
        _ => bad_request("Missing search terms"),
    }
}

async fn search_person(Query(params): Params) -> Response {
    match params.get("q") {
        Some(q) if !q.is_empty() => Json(fixtures::search_person(q, echo(&params))).into_response(),
        _ => bad_request("Missing search terms"),
    }
}

async fn categories() -> Json<Value> {
    Json(fixtures::categories())
}

async fn recent_episodes(Query(params): Params) -> Json<Value> {
    Json(fixtures::recent_episodes(params.get("max").map(String::as_str)))
}

async fn recent_feeds(Query(params): Params) -> Json<Value> {
    Json(fixtures::recent_feeds(
        params.get("max").map(String::as_str),
        param_i64(&params, "since"),
    ))
}

async fn recent_new_feeds(Query(params): Params) -> Json<Value> {
    Json(fixtures::recent_new_feeds(params.get("max").map(String::as_str)))
}

async fn recent_soundbites() -> Json<Value> {
    Json(fixtures::recent_soundbites())
}

async fn podcast_by_url(Query(params): Params) -> Response {
    match params.get("url") {
        Some(url) if url == fixtures::KNOWN_FEED_URL => {
            Json(fixtures::podcast(echo(&params))).into_response()
        }
        Some(_) => Json(fixtures::podcast_not_found(echo(&params))).into_response(),
        None => bad_request("Missing feed url"),
    }
}

async fn podcast_by_id(Query(params): Params) -> Response {
    match param_u64(&params, "id") {
        Some(fixtures::KNOWN_FEED_ID) => Json(fixtures::podcast(echo(&params))).into_response(),
        Some(_) => Json(fixtures::podcast_not_found(echo(&params))).into_response(),
        None => bad_request("Missing feed id"),
    }
}

async fn podcast_by_itunes_id(Query(params): Params) -> Response {
    match param_u64(&params, "id") {
        Some(fixtures::KNOWN_ITUNES_ID) => Json(fixtures::podcast(echo(&params))).into_response(),
        Some(_) => Json(fixtures::podcast_not_found(echo(&params))).into_response(),
        None => bad_request("Missing itunes id"),
    }
}

async fn trending(Query(params): Params) -> Json<Value> {
    Json(fixtures::trending(
        params.get("max").map(String::as_str),
        param_i64(&params, "since"),
    ))
}

async fn episodes_by_feed_url(Query(params): Params) -> Response {
    if !params.contains_key("url") {
        return bad_request("Missing feed url");
    }
    Json(fixtures::episodes(&[fixtures::KNOWN_FEED_ID], echo(&params))).into_response()
}

async fn episodes_by_feed_id(Query(params): Params) -> Response {
    let ids: Option<Vec<u64>> = params
        .get("id")
        .and_then(|raw| raw.split(',').map(|id| id.trim().parse().ok()).collect());
    match ids {
        Some(ids) if !ids.is_empty() => Json(fixtures::episodes(&ids, echo(&params))).into_response(),
        _ => bad_request("Missing feed id"),
    }
}

async fn episodes_by_itunes_id(Query(params): Params) -> Response {
    if param_u64(&params, "id").is_none() {
        return bad_request("Missing itunes id");
    }
    Json(fixtures::episodes(&[fixtures::KNOWN_FEED_ID], echo(&params))).into_response()
}

async fn episode_by_id(Query(params): Params) -> Response {
    match param_u64(&params, "id") {
        Some(id) if id == fixtures::KNOWN_EPISODE_ID => {
            Json(fixtures::episode_by_id(id)).into_response()
        }
        Some(id) => Json(fixtures::episode_not_found(id)).into_response(),
        None => bad_request("Missing episode id"),
    }
}

async fn episodes_random(Query(params): Params) -> Json<Value> {
    Json(fixtures::episodes_random(params.get("max").map(String::as_str)))
}

async fn stats() -> Json<Value> {
    Json(fixtures::stats())
}

async fn track(State(state): State<AppState>, Json(event): Json<Value>) -> StatusCode {
    debug!(event = %event["event"], "telemetry event");
    state.events.write().await.push(event);
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(key: &str, date: &str, auth: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-auth-key", key.parse().unwrap());
        headers.insert("x-auth-date", date.parse().unwrap());
        headers.insert("authorization", auth.parse().unwrap());
        headers
    }

    #[test]
    fn digest_matches_known_vector() {
        let state = AppState::new("key", "secret");
        assert_eq!(
            state.expected_digest("1601772162"),
            "fb7b72434b71a255dbadf609ead6003af712eec9"
        );
    }

    #[test]
    fn valid_signature_is_authorized() {
        let state = AppState::new("key", "secret");
        let h = headers("key", "1601772162", "fb7b72434b71a255dbadf609ead6003af712eec9");
        assert!(state.is_authorized(&h));
    }

    #[test]
    fn wrong_key_or_digest_is_rejected() {
        let state = AppState::new("key", "secret");
        let digest = "fb7b72434b71a255dbadf609ead6003af712eec9";
        assert!(!state.is_authorized(&headers("other", "1601772162", digest)));
        assert!(!state.is_authorized(&headers("key", "1601772163", digest)));
        assert!(!state.is_authorized(&HeaderMap::new()));
    }

    #[test]
    fn recorded_request_serializes() {
        let recorded = RecordedRequest {
            path: "/stats/current".to_string(),
            query: None,
            user_agent: Some("podcastindex-rs/0.1.0".to_string()),
            authorized: true,
        };
        let json = serde_json::to_value(&recorded).unwrap();
        assert_eq!(json["path"], "/stats/current");
        assert!(json["query"].is_null());
    }
}
