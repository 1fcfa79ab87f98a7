//! Async dispatcher: runs built requests over reqwest.
//!
//! # Design
//! `PodcastIndex` is the host half of the host-does-IO split. It asks
//! `PodcastIndexClient` for a signed `HttpRequest`, performs exactly one GET,
//! hands the `HttpResponse` back to `parse_response`, and reports the call to
//! telemetry. There is no retry, timeout or backoff layer.

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::client::PodcastIndexClient;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{HttpRequest, HttpResponse};
use crate::options::{
    EpisodesOptions, FeedFilterOptions, FeedIds, PersonOptions, RandomEpisodesOptions,
    RecentEpisodesOptions, RecentNewFeedsOptions, SearchOptions,
};
use crate::query::{ArrayEncoding, QueryOptions};
use crate::telemetry::{HttpCollector, Telemetry, TelemetryContext};
use crate::types::{
    Categories, EpisodeById, Episodes, Podcast, RandomEpisodes, RecentEpisodes, RecentFeeds,
    RecentNewFeeds, RecentSoundbites, Search, SearchPerson, Stats, Trending,
};

/// Async Podcast Index client. Cheap to clone; clones share the HTTP pool.
#[derive(Debug, Clone)]
pub struct PodcastIndex {
    builder: PodcastIndexClient,
    http: reqwest::Client,
    telemetry: Telemetry,
}

impl PodcastIndex {
    /// Fails with `ClientError::Configuration` on empty credentials.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let builder = PodcastIndexClient::from_config(&config)?;
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        let telemetry = build_telemetry(&config, &http);
        Ok(Self::with_parts(builder, http, telemetry))
    }

    /// Build from `ClientConfig::from_env`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Assemble from ready-made parts, e.g. a custom telemetry sink.
    pub fn with_parts(builder: PodcastIndexClient, http: reqwest::Client, telemetry: Telemetry) -> Self {
        telemetry.track("Initialized", Map::new());
        Self {
            builder,
            http,
            telemetry,
        }
    }

    pub fn builder(&self) -> &PodcastIndexClient {
        &self.builder
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Send one built request and parse the response into `T`.
    pub async fn execute<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, ClientError> {
        let response = self.send(&request).await?;
        self.builder.parse_response(response)
    }

    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        let started = Instant::now();
        let mut outgoing = self.http.get(&request.url);
        for (name, value) in &request.headers {
            outgoing = outgoing.header(name.as_str(), value.as_str());
        }

        let result = match outgoing.send().await {
            Ok(response) => read_response(response).await,
            Err(e) => Err(ClientError::from(e)),
        };
        let elapsed = started.elapsed();

        match &result {
            Ok(response) => debug!(
                url = %request.url,
                status = response.status,
                duration_ms = elapsed.as_millis() as u64,
                "api request"
            ),
            Err(e) => debug!(url = %request.url, error = %e, "api request failed"),
        }

        let mut props = Map::new();
        props.insert("endpoint".to_string(), Value::from(request.endpoint.as_str()));
        props.insert("duration_ms".to_string(), Value::from(elapsed.as_millis() as u64));
        props.insert(
            "status".to_string(),
            result.as_ref().map_or(Value::Null, |r| Value::from(r.status)),
        );
        props.insert("params".to_string(), Value::from(request.query.as_str()));
        self.telemetry.track("api_request", props);

        result
    }

    pub async fn search(&self, term: &str, options: &SearchOptions) -> Result<Search, ClientError> {
        self.execute(self.builder.build_search(term, options)?).await
    }

    pub async fn search_person(&self, person: &str, options: &PersonOptions) -> Result<SearchPerson, ClientError> {
        self.execute(self.builder.build_search_person(person, options)?).await
    }

    pub async fn categories(&self) -> Result<Categories, ClientError> {
        self.execute(self.builder.build_categories()?).await
    }

    pub async fn recent_episodes(&self, options: &RecentEpisodesOptions) -> Result<RecentEpisodes, ClientError> {
        self.execute(self.builder.build_recent_episodes(options)?).await
    }

    pub async fn recent_feeds(&self, options: &FeedFilterOptions) -> Result<RecentFeeds, ClientError> {
        self.execute(self.builder.build_recent_feeds(options)?).await
    }

    pub async fn recent_new_feeds(&self, options: &RecentNewFeedsOptions) -> Result<RecentNewFeeds, ClientError> {
        self.execute(self.builder.build_recent_new_feeds(options)?).await
    }

    pub async fn recent_soundbites(&self, max: Option<u32>) -> Result<RecentSoundbites, ClientError> {
        self.execute(self.builder.build_recent_soundbites(max)?).await
    }

    pub async fn podcast_by_url(&self, url: &str) -> Result<Podcast, ClientError> {
        self.execute(self.builder.build_podcast_by_url(url)?).await
    }

    pub async fn podcast_by_id(&self, id: u64) -> Result<Podcast, ClientError> {
        self.execute(self.builder.build_podcast_by_id(id)?).await
    }

    pub async fn podcast_by_itunes_id(&self, id: u64) -> Result<Podcast, ClientError> {
        self.execute(self.builder.build_podcast_by_itunes_id(id)?).await
    }

    pub async fn trending(&self, options: &FeedFilterOptions) -> Result<Trending, ClientError> {
        self.execute(self.builder.build_trending(options)?).await
    }

    pub async fn episodes_by_feed_url(&self, url: &str, options: &EpisodesOptions) -> Result<Episodes, ClientError> {
        self.execute(self.builder.build_episodes_by_feed_url(url, options)?).await
    }

    pub async fn episodes_by_feed_id(
        &self,
        ids: impl Into<FeedIds>,
        options: &EpisodesOptions,
    ) -> Result<Episodes, ClientError> {
        self.execute(self.builder.build_episodes_by_feed_id(ids, options)?).await
    }

    pub async fn episodes_by_itunes_id(&self, id: u64, options: &EpisodesOptions) -> Result<Episodes, ClientError> {
        self.execute(self.builder.build_episodes_by_itunes_id(id, options)?).await
    }

    pub async fn episode_by_id(&self, id: u64) -> Result<EpisodeById, ClientError> {
        self.execute(self.builder.build_episode_by_id(id)?).await
    }

    pub async fn episodes_random(&self, options: &RandomEpisodesOptions) -> Result<RandomEpisodes, ClientError> {
        self.execute(self.builder.build_episodes_random(options)?).await
    }

    pub async fn stats(&self) -> Result<Stats, ClientError> {
        self.execute(self.builder.build_stats()?).await
    }

    /// Any endpoint, untyped.
    pub async fn raw(
        &self,
        endpoint: &str,
        query: &QueryOptions,
        encoding: ArrayEncoding,
    ) -> Result<Value, ClientError> {
        self.raw_as(endpoint, query, encoding).await
    }

    /// Any endpoint, deserialized into a caller-chosen shape.
    pub async fn raw_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &QueryOptions,
        encoding: ArrayEncoding,
    ) -> Result<T, ClientError> {
        self.execute(self.builder.build_raw(endpoint, query, encoding)?).await
    }
}

async fn read_response(response: reqwest::Response) -> Result<HttpResponse, ClientError> {
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
        .collect();
    let body = response.text().await?;
    Ok(HttpResponse { status, headers, body })
}

fn build_telemetry(config: &ClientConfig, http: &reqwest::Client) -> Telemetry {
    if !config.enable_analytics {
        return Telemetry::disabled();
    }
    let Some(url) = &config.telemetry_url else {
        warn!("analytics enabled without a collector URL, telemetry disabled");
        return Telemetry::disabled();
    };
    let context = TelemetryContext::new(&config.api_key).with_property("userAgent", config.user_agent.as_str());
    Telemetry::new(context, Arc::new(HttpCollector::new(http.clone(), url.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_key() {
        let err = PodcastIndex::new(ClientConfig::new("", "secret")).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn analytics_off_by_default() {
        let client = PodcastIndex::new(ClientConfig::new("key", "secret")).unwrap();
        assert!(!client.telemetry().is_enabled());
    }

    #[test]
    fn analytics_without_url_stays_disabled() {
        let mut config = ClientConfig::new("key", "secret");
        config.enable_analytics = true;
        let client = PodcastIndex::new(config).unwrap();
        assert!(!client.telemetry().is_enabled());
    }

    #[test]
    fn analytics_context_carries_key() {
        let config = ClientConfig::new("key", "secret").with_analytics("http://127.0.0.1:9/track");
        let client = PodcastIndex::new(config).unwrap();
        assert!(client.telemetry().is_enabled());
        assert_eq!(client.telemetry().context().properties()["distinct_id"], "key");
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<PodcastIndex>();
    }
}
