use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, fixtures, AppState};
use serde_json::Value;
use sha1::{Digest, Sha1};
use tower::ServiceExt;

const KEY: &str = "test-key";
const SECRET: &str = "test-secret";
const DATE: &str = "1700000000";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn digest(key: &str, secret: &str, date: &str) -> String {
    hex::encode(Sha1::digest(format!("{key}{secret}{date}").as_bytes()))
}

fn signed(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header("X-Auth-Date", DATE)
        .header("X-Auth-Key", KEY)
        .header("Authorization", digest(KEY, SECRET, DATE))
        .header("User-Agent", "podcastindex-rs/test")
        .body(String::new())
        .unwrap()
}

fn state() -> AppState {
    AppState::new(KEY, SECRET)
}

// --- auth ---

#[test]
fn digest_helper_matches_known_vector() {
    assert_eq!(digest(KEY, SECRET, DATE), "2782ad65bd878a76107dd3f1cdbfabe647607c5d");
}

#[tokio::test]
async fn signed_request_is_accepted() {
    let state = state();
    let resp = app(state.clone()).oneshot(signed("/api/1.0/stats/current")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["stats"]["feedCountTotal"], 4044021);

    let requests = state.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/stats/current");
    assert!(requests[0].authorized);
    assert_eq!(requests[0].user_agent.as_deref(), Some("podcastindex-rs/test"));
}

#[tokio::test]
async fn tampered_signature_returns_401() {
    let state = state();
    let req = Request::builder()
        .uri("/api/1.0/stats/current")
        .header("X-Auth-Date", "1700000001")
        .header("X-Auth-Key", KEY)
        .header("Authorization", digest(KEY, SECRET, DATE))
        .body(String::new())
        .unwrap();
    let resp = app(state.clone()).oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "false");
    assert!(!state.requests().await[0].authorized);
}

#[tokio::test]
async fn missing_headers_return_401() {
    let req = Request::builder()
        .uri("/api/1.0/categories/list")
        .body(String::new())
        .unwrap();
    let resp = app(state()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_secret_returns_401() {
    let req = Request::builder()
        .uri("/api/1.0/categories/list")
        .header("X-Auth-Date", DATE)
        .header("X-Auth-Key", KEY)
        .header("Authorization", digest(KEY, "other-secret", DATE))
        .body(String::new())
        .unwrap();
    let resp = app(state()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- routing ---

#[tokio::test]
async fn unknown_api_path_returns_404_and_is_recorded() {
    let state = state();
    let resp = app(state.clone()).oneshot(signed("/api/1.0/nope/missing")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(state.hits("/nope/missing").await, 1);
}

#[tokio::test]
async fn search_echoes_query() {
    let state = state();
    let resp = app(state.clone())
        .oneshot(signed("/api/1.0/search/byterm?q=batman%20university&clean&max=5"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["query"]["q"], "batman university");
    assert_eq!(body["query"]["clean"], "");
    assert_eq!(body["count"], 2);
    assert_eq!(
        state.requests().await[0].query.as_deref(),
        Some("q=batman%20university&clean&max=5")
    );
}

#[tokio::test]
async fn search_without_term_returns_400() {
    let resp = app(state()).oneshot(signed("/api/1.0/search/byterm")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn episodes_by_feed_id_accepts_comma_list() {
    let resp = app(state())
        .oneshot(signed("/api/1.0/episodes/byfeedid?id=75075,920666&max=2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["items"][0]["feedId"], 75075);
    assert_eq!(body["items"][1]["feedId"], 920666);
}

#[tokio::test]
async fn podcast_by_unknown_id_returns_empty_feed() {
    let resp = app(state())
        .oneshot(signed("/api/1.0/podcasts/byfeedid?id=1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["feed"], serde_json::json!([]));
}

#[tokio::test]
async fn podcast_by_known_id() {
    let uri = format!("/api/1.0/podcasts/byfeedid?id={}", fixtures::KNOWN_FEED_ID);
    let resp = app(state()).oneshot(signed(&uri)).await.unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["feed"]["id"], fixtures::KNOWN_FEED_ID);
    assert_eq!(body["feed"]["value"]["model"]["type"], "lightning");
}

#[tokio::test]
async fn episode_by_unknown_id_returns_empty_episode() {
    let resp = app(state()).oneshot(signed("/api/1.0/episodes/byid?id=1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["episode"], serde_json::json!([]));
    assert_eq!(body["id"], "1");
}

#[tokio::test]
async fn episode_by_known_id() {
    let uri = format!("/api/1.0/episodes/byid?id={}", fixtures::KNOWN_EPISODE_ID);
    let resp = app(state()).oneshot(signed(&uri)).await.unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["episode"]["id"], fixtures::KNOWN_EPISODE_ID);
    assert_eq!(body["episode"]["feedTitle"], "Podcasting 2.0");
}

#[tokio::test]
async fn recent_feeds_echoes_since() {
    let resp = app(state())
        .oneshot(signed("/api/1.0/recent/feeds?max=2&since=1613394000"))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["since"], 1613394000);
    assert_eq!(body["max"], "2");
}

// --- telemetry collector ---

#[tokio::test]
async fn track_records_event_without_auth() {
    let state = state();
    let req = Request::builder()
        .method("POST")
        .uri("/track")
        .header("Content-Type", "application/json")
        .body(r#"{"event":"Initialized","properties":{"distinct_id":"test-key"}}"#.to_string())
        .unwrap();
    let resp = app(state.clone()).oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let events = state.events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event"], "Initialized");
    assert!(state.requests().await.is_empty());
}
