//! Typed option bags for the endpoint methods.
//!
//! Each bag knows the API's parameter names and writes itself into a
//! `QueryOptions`; unset fields become `Absent` and fall out during
//! encoding. `since` values go through `to_epoch_timestamp` first.

use crate::query::{QueryOptions, QueryValue};
use crate::time::{to_epoch_timestamp, Timestamp};

fn list(values: &[String]) -> QueryValue {
    QueryValue::from(values.to_vec())
}

fn since(value: Option<Timestamp>) -> QueryValue {
    QueryValue::from(to_epoch_timestamp(value))
}

/// `/search/byterm`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// Only non-explicit feeds.
    pub clean: bool,
    /// Return full text in description fields instead of truncating.
    pub fulltext: bool,
    pub max: Option<u32>,
}

impl SearchOptions {
    pub(crate) fn write(&self, query: &mut QueryOptions) {
        query.insert("clean", self.clean);
        query.insert("fulltext", self.fulltext);
        query.insert("max", self.max);
    }
}

/// `/search/byperson`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonOptions {
    pub fulltext: bool,
    pub max: Option<u32>,
}

impl PersonOptions {
    pub(crate) fn write(&self, query: &mut QueryOptions) {
        query.insert("fulltext", self.fulltext);
        query.insert("max", self.max);
    }
}

/// `/recent/episodes`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecentEpisodesOptions {
    pub max: Option<u32>,
    /// Drop any item whose title or feed title contains this string.
    pub exclude_string: Option<String>,
    /// Only episodes with an id below this one, for walking back in time.
    pub before: Option<u64>,
    pub fulltext: bool,
}

impl RecentEpisodesOptions {
    pub(crate) fn write(&self, query: &mut QueryOptions) {
        query.insert("max", self.max);
        query.insert("excludeString", self.exclude_string.clone());
        query.insert("before", self.before);
        query.insert("fulltext", self.fulltext);
    }
}

/// Shared by `/recent/feeds` and `/podcasts/trending`.
///
/// Multiple categories are OR'd by the server; `not_category` excludes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedFilterOptions {
    pub max: Option<u32>,
    pub since: Option<Timestamp>,
    pub lang: Vec<String>,
    pub category: Vec<String>,
    pub not_category: Vec<String>,
}

impl FeedFilterOptions {
    pub(crate) fn write(&self, query: &mut QueryOptions) {
        query.insert("max", self.max);
        query.insert("since", since(self.since));
        query.insert("lang", list(&self.lang));
        query.insert("cat", list(&self.category));
        query.insert("notcat", list(&self.not_category));
    }
}

/// `/recent/newfeeds`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecentNewFeedsOptions {
    pub max: Option<u32>,
    pub since: Option<Timestamp>,
}

impl RecentNewFeedsOptions {
    pub(crate) fn write(&self, query: &mut QueryOptions) {
        query.insert("max", self.max);
        query.insert("since", since(self.since));
    }
}

/// `/episodes/byfeedurl`, `/episodes/byfeedid`, `/episodes/byitunesid`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodesOptions {
    pub max: Option<u32>,
    /// Absolute time, or negative seconds relative to now.
    pub since: Option<Timestamp>,
    pub fulltext: bool,
}

impl EpisodesOptions {
    pub(crate) fn write(&self, query: &mut QueryOptions) {
        query.insert("max", self.max);
        query.insert("since", since(self.since));
        query.insert("fulltext", self.fulltext);
    }
}

/// `/episodes/random`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RandomEpisodesOptions {
    pub max: Option<u32>,
    pub lang: Vec<String>,
    pub category: Vec<String>,
    pub not_category: Vec<String>,
    pub fulltext: bool,
}

impl RandomEpisodesOptions {
    pub(crate) fn write(&self, query: &mut QueryOptions) {
        query.insert("max", self.max);
        query.insert("lang", list(&self.lang));
        query.insert("cat", list(&self.category));
        query.insert("notcat", list(&self.not_category));
        query.insert("fulltext", self.fulltext);
    }
}

/// One feed id or several; several are sent comma-joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedIds(pub Vec<u64>);

impl From<u64> for FeedIds {
    fn from(id: u64) -> Self {
        FeedIds(vec![id])
    }
}

impl From<Vec<u64>> for FeedIds {
    fn from(ids: Vec<u64>) -> Self {
        FeedIds(ids)
    }
}

impl From<&[u64]> for FeedIds {
    fn from(ids: &[u64]) -> Self {
        FeedIds(ids.to_vec())
    }
}

impl From<FeedIds> for QueryValue {
    fn from(ids: FeedIds) -> Self {
        QueryValue::from(ids.0)
    }
}
