//! Stateless request builder and response parser for the Podcast Index API.
//!
//! # Design
//! `PodcastIndexClient` holds the base URL, the user agent and the
//! credentials, and nothing that changes between calls. Each endpoint has a
//! `build_*` method producing a signed `HttpRequest`; every response goes
//! through the one generic `parse_response`. The caller runs the HTTP
//! round-trip in between, which keeps this half deterministic and free of
//! I/O. `dispatch.rs` wires the two halves to reqwest.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::auth::{current_unix_time, Credentials, RequestSigner};
use crate::config::{ClientConfig, DEFAULT_USER_AGENT};
use crate::error::ClientError;
use crate::http::{status_text, HttpRequest, HttpResponse};
use crate::options::{
    EpisodesOptions, FeedFilterOptions, FeedIds, PersonOptions, RandomEpisodesOptions,
    RecentEpisodesOptions, RecentNewFeedsOptions, SearchOptions,
};
use crate::query::{ArrayEncoding, QueryOptions};

/// Endpoint paths, relative to the versioned base URL.
pub mod endpoints {
    pub const SEARCH_BY_TERM: &str = "/search/byterm";
    pub const SEARCH_BY_PERSON: &str = "/search/byperson";
    pub const CATEGORIES_LIST: &str = "/categories/list";
    pub const RECENT_EPISODES: &str = "/recent/episodes";
    pub const RECENT_FEEDS: &str = "/recent/feeds";
    pub const RECENT_NEW_FEEDS: &str = "/recent/newfeeds";
    pub const RECENT_SOUNDBITES: &str = "/recent/soundbites";
    pub const PODCASTS_BY_FEED_URL: &str = "/podcasts/byfeedurl";
    pub const PODCASTS_BY_FEED_ID: &str = "/podcasts/byfeedid";
    pub const PODCASTS_BY_ITUNES_ID: &str = "/podcasts/byitunesid";
    pub const PODCASTS_TRENDING: &str = "/podcasts/trending";
    pub const EPISODES_BY_FEED_URL: &str = "/episodes/byfeedurl";
    pub const EPISODES_BY_FEED_ID: &str = "/episodes/byfeedid";
    pub const EPISODES_BY_ITUNES_ID: &str = "/episodes/byitunesid";
    pub const EPISODES_BY_ID: &str = "/episodes/byid";
    pub const EPISODES_RANDOM: &str = "/episodes/random";
    pub const STATS_CURRENT: &str = "/stats/current";
}

/// Synchronous, stateless request builder for the Podcast Index API.
#[derive(Debug, Clone)]
pub struct PodcastIndexClient {
    base_url: String,
    user_agent: String,
    credentials: Arc<Credentials>,
}

impl PodcastIndexClient {
    pub fn new(credentials: Credentials, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            credentials: Arc::new(credentials),
        }
    }

    /// Fails with `ClientError::Configuration` if the key or secret is empty.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let credentials = Credentials::new(config.api_key.clone(), config.api_secret.clone())?;
        Ok(Self::new(credentials, &config.base_url).with_user_agent(&config.user_agent))
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build a GET for `endpoint`, signed with the current time.
    pub fn build_request(
        &self,
        endpoint: &str,
        query: &QueryOptions,
        encoding: ArrayEncoding,
    ) -> Result<HttpRequest, ClientError> {
        self.build_request_at(endpoint, query, encoding, current_unix_time())
    }

    /// Build a GET for `endpoint`, signed for the given Unix second.
    pub fn build_request_at(
        &self,
        endpoint: &str,
        query: &QueryOptions,
        encoding: ArrayEncoding,
        unix_time: i64,
    ) -> Result<HttpRequest, ClientError> {
        let headers = RequestSigner::new(&self.credentials, &self.user_agent).sign_at(unix_time)?;

        let endpoint = if endpoint.starts_with('/') {
            endpoint.to_string()
        } else {
            format!("/{endpoint}")
        };
        let query = query.encode(encoding);
        let url = if query.is_empty() {
            format!("{}{endpoint}", self.base_url)
        } else {
            format!("{}{endpoint}?{query}", self.base_url)
        };

        Ok(HttpRequest {
            url,
            endpoint,
            query,
            headers,
        })
    }

    fn get(&self, endpoint: &str, query: QueryOptions) -> Result<HttpRequest, ClientError> {
        self.build_request(endpoint, &query, ArrayEncoding::Comma)
    }

    pub fn build_search(&self, term: &str, options: &SearchOptions) -> Result<HttpRequest, ClientError> {
        let mut query = QueryOptions::new().with("q", term);
        options.write(&mut query);
        self.get(endpoints::SEARCH_BY_TERM, query)
    }

    pub fn build_search_person(&self, person: &str, options: &PersonOptions) -> Result<HttpRequest, ClientError> {
        let mut query = QueryOptions::new().with("q", person);
        options.write(&mut query);
        self.get(endpoints::SEARCH_BY_PERSON, query)
    }

    pub fn build_categories(&self) -> Result<HttpRequest, ClientError> {
        self.get(endpoints::CATEGORIES_LIST, QueryOptions::new())
    }

    pub fn build_recent_episodes(&self, options: &RecentEpisodesOptions) -> Result<HttpRequest, ClientError> {
        let mut query = QueryOptions::new();
        options.write(&mut query);
        self.get(endpoints::RECENT_EPISODES, query)
    }

    pub fn build_recent_feeds(&self, options: &FeedFilterOptions) -> Result<HttpRequest, ClientError> {
        let mut query = QueryOptions::new();
        options.write(&mut query);
        self.get(endpoints::RECENT_FEEDS, query)
    }

    pub fn build_recent_new_feeds(&self, options: &RecentNewFeedsOptions) -> Result<HttpRequest, ClientError> {
        let mut query = QueryOptions::new();
        options.write(&mut query);
        self.get(endpoints::RECENT_NEW_FEEDS, query)
    }

    pub fn build_recent_soundbites(&self, max: Option<u32>) -> Result<HttpRequest, ClientError> {
        self.get(endpoints::RECENT_SOUNDBITES, QueryOptions::new().with("max", max))
    }

    pub fn build_podcast_by_url(&self, url: &str) -> Result<HttpRequest, ClientError> {
        self.get(endpoints::PODCASTS_BY_FEED_URL, QueryOptions::new().with("url", url))
    }

    pub fn build_podcast_by_id(&self, id: u64) -> Result<HttpRequest, ClientError> {
        self.get(endpoints::PODCASTS_BY_FEED_ID, QueryOptions::new().with("id", id))
    }

    pub fn build_podcast_by_itunes_id(&self, id: u64) -> Result<HttpRequest, ClientError> {
        self.get(endpoints::PODCASTS_BY_ITUNES_ID, QueryOptions::new().with("id", id))
    }

    pub fn build_trending(&self, options: &FeedFilterOptions) -> Result<HttpRequest, ClientError> {
        let mut query = QueryOptions::new();
        options.write(&mut query);
        self.get(endpoints::PODCASTS_TRENDING, query)
    }

    pub fn build_episodes_by_feed_url(&self, url: &str, options: &EpisodesOptions) -> Result<HttpRequest, ClientError> {
        let mut query = QueryOptions::new().with("url", url);
        options.write(&mut query);
        self.get(endpoints::EPISODES_BY_FEED_URL, query)
    }

    pub fn build_episodes_by_feed_id(
        &self,
        ids: impl Into<FeedIds>,
        options: &EpisodesOptions,
    ) -> Result<HttpRequest, ClientError> {
        let mut query = QueryOptions::new().with("id", ids.into());
        options.write(&mut query);
        self.get(endpoints::EPISODES_BY_FEED_ID, query)
    }

    pub fn build_episodes_by_itunes_id(&self, id: u64, options: &EpisodesOptions) -> Result<HttpRequest, ClientError> {
        let mut query = QueryOptions::new().with("id", id);
        options.write(&mut query);
        self.get(endpoints::EPISODES_BY_ITUNES_ID, query)
    }

    pub fn build_episode_by_id(&self, id: u64) -> Result<HttpRequest, ClientError> {
        self.get(endpoints::EPISODES_BY_ID, QueryOptions::new().with("id", id))
    }

    pub fn build_episodes_random(&self, options: &RandomEpisodesOptions) -> Result<HttpRequest, ClientError> {
        let mut query = QueryOptions::new();
        options.write(&mut query);
        self.get(endpoints::EPISODES_RANDOM, query)
    }

    pub fn build_stats(&self) -> Result<HttpRequest, ClientError> {
        self.get(endpoints::STATS_CURRENT, QueryOptions::new())
    }

    /// Escape hatch for endpoints without a typed method.
    pub fn build_raw(
        &self,
        endpoint: &str,
        query: &QueryOptions,
        encoding: ArrayEncoding,
    ) -> Result<HttpRequest, ClientError> {
        self.build_request(endpoint, query, encoding)
    }

    /// Check the status and deserialize a 2xx body into `T`.
    pub fn parse_response<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ClientError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ClientError::Deserialization(e.to_string()))
    }
}

/// Map any non-2xx status to `ClientError::Api`.
fn check_status(response: &HttpResponse) -> Result<(), ClientError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    Err(ClientError::Api {
        status: response.status,
        status_text: status_text(response.status),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Categories, Stats};

    const NOW: i64 = 1601772162;

    fn client() -> PodcastIndexClient {
        PodcastIndexClient::new(Credentials::new("key", "secret").unwrap(), "http://localhost:3000/api/1.0")
    }

    #[test]
    fn build_request_signs_and_encodes() {
        let query = QueryOptions::new().with("q", "batman university").with("max", 3);
        let req = client()
            .build_request_at(endpoints::SEARCH_BY_TERM, &query, ArrayEncoding::Comma, NOW)
            .unwrap();
        assert_eq!(
            req.url,
            "http://localhost:3000/api/1.0/search/byterm?q=batman%20university&max=3"
        );
        assert_eq!(req.endpoint, "/search/byterm");
        assert_eq!(req.query, "q=batman%20university&max=3");
        assert_eq!(req.header("X-Auth-Date"), Some("1601772162"));
        assert_eq!(req.header("Authorization"), Some("fb7b72434b71a255dbadf609ead6003af712eec9"));
        assert_eq!(req.header("X-Auth-Key"), Some("key"));
    }

    #[test]
    fn empty_query_has_no_question_mark() {
        let req = client().build_categories().unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/1.0/categories/list");
        assert!(req.query.is_empty());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = PodcastIndexClient::new(Credentials::new("key", "secret").unwrap(), "http://localhost:3000/");
        let req = client.build_stats().unwrap();
        assert_eq!(req.url, "http://localhost:3000/stats/current");
    }

    #[test]
    fn raw_path_gets_a_leading_slash() {
        let req = client()
            .build_raw("value/byfeedid", &QueryOptions::new().with("id", 920666), ArrayEncoding::Comma)
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/1.0/value/byfeedid?id=920666");
    }

    #[test]
    fn raw_supports_bracket_arrays() {
        let query = QueryOptions::new().with("cat", vec!["News", "Comedy"]);
        let req = client().build_raw("/recent/feeds", &query, ArrayEncoding::Bracket).unwrap();
        assert_eq!(req.query, "cat[]=News,Comedy");
    }

    #[test]
    fn build_search_omits_unset_options() {
        let req = client().build_search("javascript", &SearchOptions::default()).unwrap();
        assert_eq!(req.query, "q=javascript");
    }

    #[test]
    fn build_episodes_by_feed_id_joins_ids() {
        let options = EpisodesOptions {
            max: Some(1),
            ..Default::default()
        };
        let req = client().build_episodes_by_feed_id(vec![75075_u64, 920666], &options).unwrap();
        assert_eq!(req.endpoint, "/episodes/byfeedid");
        assert_eq!(req.query, "id=75075,920666&max=1");
    }

    #[test]
    fn build_podcast_by_url_encodes_url() {
        let req = client().build_podcast_by_url("https://feeds.twit.tv/twit.xml").unwrap();
        assert_eq!(req.query, "url=https%3A%2F%2Ffeeds.twit.tv%2Ftwit.xml");
    }

    #[test]
    fn build_recent_soundbites_without_max() {
        let req = client().build_recent_soundbites(None).unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/1.0/recent/soundbites");
    }

    #[test]
    fn parse_success() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"status":"true","feeds":[{"id":102,"name":"Technology"}],"count":1,"description":"Categories"}"#
                .to_string(),
        };
        let categories: Categories = client().parse_response(response).unwrap();
        assert_eq!(categories.count, 1);
        assert_eq!(categories.feeds[0].name, "Technology");
    }

    #[test]
    fn parse_not_found_is_api_error() {
        let response = HttpResponse {
            status: 404,
            headers: Vec::new(),
            body: String::new(),
        };
        let err = client().parse_response::<Stats>(response).unwrap_err();
        match err {
            ClientError::Api { status, status_text } => {
                assert_eq!(status, 404);
                assert_eq!(status_text, "Not Found");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn parse_bad_json() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: "not json".to_string(),
        };
        let err = client().parse_response::<Stats>(response).unwrap_err();
        assert!(matches!(err, ClientError::Deserialization(_)));
    }

    #[test]
    fn from_config_rejects_empty_secret() {
        let config = ClientConfig::new("key", "");
        let err = PodcastIndexClient::from_config(&config).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }
}
