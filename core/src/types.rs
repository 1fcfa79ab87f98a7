//! Response shapes for the Podcast Index API.
//!
//! # Design
//! These are passive serde structs. Two normalizations run while
//! deserializing: a `categories` map that is missing or `null` becomes an
//! empty map, and language codes are lower-cased. Deserializing into these
//! types is also the runtime shape check: a body that does not fit yields
//! `ClientError::Deserialization` instead of mistyped data.
//!
//! Fields the API sometimes omits or nulls are `Option` or `#[serde(default)]`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category id (as a string) to category name.
pub type CategoryMap = BTreeMap<String, String>;

mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::CategoryMap;

    pub fn categories<'de, D>(deserializer: D) -> Result<CategoryMap, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<CategoryMap>::deserialize(deserializer).map(Option::unwrap_or_default)
    }

    pub fn lowercase<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer).map(|s| s.unwrap_or_default().to_lowercase())
    }

    /// The API is inconsistent about `status` and `max`: strings, numbers
    /// and booleans all show up.
    pub fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        scalar_string_opt(deserializer).map(Option::unwrap_or_default)
    }

    /// Single-object lookups answer a miss with `[]` (sometimes `null`)
    /// instead of an object.
    pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: serde::de::DeserializeOwned,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::Array(items) if items.is_empty() => Ok(None),
            other => serde_json::from_value(other).map(Some).map_err(serde::de::Error::custom),
        }
    }

    pub fn scalar_string_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Episodes
// ---------------------------------------------------------------------------

/// Soundbite attached to an episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeSoundbite {
    pub start_time: f64,
    pub duration: f64,
    #[serde(default)]
    pub title: String,
}

/// Returned by `episodes_by_feed_*` and `episodes_by_itunes_id`; the other
/// episode shapes flatten it and add feed-level fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeInfo {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub guid: String,
    pub date_published: i64,
    #[serde(default)]
    pub date_published_pretty: Option<String>,
    #[serde(default)]
    pub date_crawled: Option<i64>,
    pub enclosure_url: String,
    #[serde(default)]
    pub enclosure_type: String,
    #[serde(default)]
    pub enclosure_length: Option<u64>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub explicit: i64,
    #[serde(default)]
    pub episode: Option<i64>,
    #[serde(default)]
    pub episode_type: Option<String>,
    #[serde(default)]
    pub season: Option<i64>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub feed_itunes_id: Option<u64>,
    #[serde(default)]
    pub feed_image: String,
    pub feed_id: u64,
    #[serde(default, deserialize_with = "de::lowercase")]
    pub feed_language: String,
    #[serde(default)]
    pub chapters_url: Option<String>,
    #[serde(default)]
    pub transcript_url: Option<String>,
    #[serde(default)]
    pub soundbite: Option<EpisodeSoundbite>,
    #[serde(default)]
    pub soundbites: Vec<EpisodeSoundbite>,
}

/// An episode with the title of its feed; from `episode_by_id` and
/// `recent_episodes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeDetail {
    #[serde(flatten)]
    pub info: EpisodeInfo,
    #[serde(default)]
    pub feed_title: String,
}

pub type RecentEpisode = EpisodeDetail;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomEpisode {
    #[serde(flatten)]
    pub info: EpisodeInfo,
    #[serde(default)]
    pub feed_title: String,
    #[serde(default, deserialize_with = "de::categories")]
    pub categories: CategoryMap,
}

/// Episode matched by `search_person`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonEpisode {
    #[serde(flatten)]
    pub info: EpisodeInfo,
    #[serde(default)]
    pub feed_url: String,
    #[serde(default)]
    pub feed_author: String,
    #[serde(default)]
    pub feed_title: String,
}

// ---------------------------------------------------------------------------
// Feeds
// ---------------------------------------------------------------------------

/// A feed as returned by search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    pub id: u64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub original_url: Option<String>,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub artwork: String,
    #[serde(default)]
    pub last_update_time: i64,
    #[serde(default)]
    pub last_crawl_time: i64,
    #[serde(default)]
    pub last_parse_time: i64,
    #[serde(default)]
    pub last_good_http_status_time: i64,
    #[serde(default)]
    pub last_http_status: i64,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub itunes_id: Option<u64>,
    #[serde(default)]
    pub generator: Option<String>,
    #[serde(default, deserialize_with = "de::lowercase")]
    pub language: String,
    /// 0 = RSS, 1 = Atom.
    #[serde(rename = "type", default)]
    pub feed_type: i64,
    #[serde(default)]
    pub dead: i64,
    #[serde(default)]
    pub crawl_errors: i64,
    #[serde(default)]
    pub parse_errors: i64,
    #[serde(default)]
    pub locked: Option<i64>,
    #[serde(default)]
    pub image_url_hash: Option<i64>,
    #[serde(default, deserialize_with = "de::categories")]
    pub categories: CategoryMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Funding {
    pub url: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueModel {
    #[serde(rename = "type")]
    pub model_type: String,
    pub method: String,
    #[serde(default)]
    pub suggested: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueDestination {
    pub name: String,
    pub address: String,
    #[serde(rename = "type")]
    pub destination_type: String,
    pub split: f64,
}

/// Value-for-value block of a podcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBlock {
    pub model: ValueModel,
    #[serde(default)]
    pub destinations: Vec<ValueDestination>,
}

/// A feed as returned by the `podcast_by_*` calls. The iTunes lookup takes a
/// different path server-side and fills fewer fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastFeed {
    #[serde(flatten)]
    pub feed: Feed,
    #[serde(default)]
    pub episode_count: Option<u64>,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub chash: Option<String>,
    #[serde(default)]
    pub value: Option<ValueBlock>,
    #[serde(default)]
    pub funding: Option<Funding>,
}

/// From `recent_feeds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeed {
    pub id: u64,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub newest_item_publish_time: i64,
    #[serde(default)]
    pub oldest_item_publish_time: Option<i64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub itunes_id: Option<u64>,
    #[serde(default, deserialize_with = "de::lowercase")]
    pub language: String,
    #[serde(default, deserialize_with = "de::categories")]
    pub categories: CategoryMap,
}

/// From `recent_new_feeds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentNewFeed {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub time_added: i64,
    #[serde(default, deserialize_with = "de::scalar_string")]
    pub status: String,
    #[serde(default)]
    pub content_hash: String,
    #[serde(default, deserialize_with = "de::lowercase")]
    pub language: String,
    #[serde(default)]
    pub image: String,
}

/// From `trending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingFeed {
    pub id: u64,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub artwork: String,
    #[serde(default)]
    pub newest_item_publish_time: i64,
    #[serde(default)]
    pub itunes_id: Option<u64>,
    #[serde(default)]
    pub trend_score: i64,
    #[serde(default, deserialize_with = "de::lowercase")]
    pub language: String,
    #[serde(default, deserialize_with = "de::categories")]
    pub categories: CategoryMap,
}

/// From `recent_soundbites`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Soundbite {
    pub enclosure_url: String,
    #[serde(default)]
    pub title: String,
    pub start_time: f64,
    pub duration: f64,
    pub episode_id: u64,
    #[serde(default)]
    pub episode_title: String,
    #[serde(default)]
    pub feed_title: String,
    #[serde(default)]
    pub feed_url: String,
    pub feed_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub feed_count_total: u64,
    pub episode_count_total: u64,
    #[serde(default)]
    pub feeds_with_new_episodes3days: u64,
    #[serde(default)]
    pub feeds_with_new_episodes10days: u64,
    #[serde(default)]
    pub feeds_with_new_episodes30days: u64,
    #[serde(default)]
    pub feeds_with_new_episodes90days: u64,
    #[serde(default)]
    pub feeds_with_value_blocks: u64,
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Search {
    #[serde(deserialize_with = "de::scalar_string")]
    pub status: String,
    pub feeds: Vec<Feed>,
    pub count: u64,
    #[serde(default)]
    pub query: Value,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPerson {
    #[serde(deserialize_with = "de::scalar_string")]
    pub status: String,
    pub items: Vec<PersonEpisode>,
    pub count: u64,
    #[serde(default)]
    pub query: Value,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categories {
    #[serde(deserialize_with = "de::scalar_string")]
    pub status: String,
    pub feeds: Vec<Category>,
    pub count: u64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentEpisodes {
    #[serde(deserialize_with = "de::scalar_string")]
    pub status: String,
    pub items: Vec<RecentEpisode>,
    pub count: u64,
    #[serde(default, deserialize_with = "de::scalar_string_opt")]
    pub max: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentFeeds {
    #[serde(deserialize_with = "de::scalar_string")]
    pub status: String,
    pub feeds: Vec<NewFeed>,
    pub count: u64,
    #[serde(default, deserialize_with = "de::scalar_string_opt")]
    pub max: Option<String>,
    #[serde(default)]
    pub since: Option<i64>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentNewFeeds {
    #[serde(deserialize_with = "de::scalar_string")]
    pub status: String,
    pub feeds: Vec<RecentNewFeed>,
    pub count: u64,
    #[serde(default, deserialize_with = "de::scalar_string_opt")]
    pub max: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSoundbites {
    #[serde(deserialize_with = "de::scalar_string")]
    pub status: String,
    pub items: Vec<Soundbite>,
    pub count: u64,
    #[serde(default)]
    pub description: String,
}

/// What the server echoes back from a `podcast_by_*` lookup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PodcastQuery {
    #[serde(default, deserialize_with = "de::scalar_string_opt")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "de::scalar_string_opt")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Podcast {
    #[serde(deserialize_with = "de::scalar_string")]
    pub status: String,
    /// `None` when no feed matched.
    #[serde(deserialize_with = "de::empty_as_none")]
    pub feed: Option<PodcastFeed>,
    #[serde(default)]
    pub query: PodcastQuery,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episodes {
    #[serde(deserialize_with = "de::scalar_string")]
    pub status: String,
    pub items: Vec<EpisodeInfo>,
    pub count: u64,
    #[serde(default)]
    pub query: Value,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeById {
    #[serde(deserialize_with = "de::scalar_string")]
    pub status: String,
    #[serde(default, deserialize_with = "de::scalar_string_opt")]
    pub id: Option<String>,
    /// `None` when no episode matched.
    #[serde(deserialize_with = "de::empty_as_none")]
    pub episode: Option<EpisodeDetail>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomEpisodes {
    #[serde(deserialize_with = "de::scalar_string")]
    pub status: String,
    pub episodes: Vec<RandomEpisode>,
    pub count: u64,
    #[serde(default, deserialize_with = "de::scalar_string_opt")]
    pub max: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trending {
    #[serde(deserialize_with = "de::scalar_string")]
    pub status: String,
    pub feeds: Vec<TrendingFeed>,
    pub count: u64,
    #[serde(default, deserialize_with = "de::scalar_string_opt")]
    pub max: Option<String>,
    #[serde(default)]
    pub since: Option<i64>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(deserialize_with = "de::scalar_string")]
    pub status: String,
    pub stats: IndexStats,
    #[serde(default)]
    pub description: String,
}
