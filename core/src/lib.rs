//! Typed client for the Podcast Index API.
//!
//! # Overview
//! Two halves. `PodcastIndexClient` builds signed `HttpRequest` values and
//! parses `HttpResponse` values without touching the network, so any
//! transport can drive it. `PodcastIndex` is the async host that runs those
//! requests over reqwest, one attempt per call, and reports usage to an
//! optional telemetry collector.
//!
//! # Design
//! - Shared state is immutable: the credential pair and the telemetry
//!   context. Calls run concurrently without locks.
//! - Query options keep their insertion order. Falsy values are dropped
//!   during encoding; `QueryValue::Verbatim` opts out of that.
//! - Responses deserialize into the structs in `types`, which also
//!   normalizes `categories` and language codes. `raw` skips the typing.
//! - Response DTOs are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod auth;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod options;
pub mod query;
pub mod telemetry;
pub mod time;
pub mod types;

pub use auth::{auth_digest, Credentials, RequestSigner};
pub use client::PodcastIndexClient;
pub use config::ClientConfig;
pub use dispatch::PodcastIndex;
pub use error::ClientError;
pub use http::{HttpRequest, HttpResponse};
pub use options::{
    EpisodesOptions, FeedFilterOptions, FeedIds, PersonOptions, RandomEpisodesOptions,
    RecentEpisodesOptions, RecentNewFeedsOptions, SearchOptions,
};
pub use query::{encode_query, ArrayEncoding, QueryOptions, QueryValue};
pub use telemetry::{Telemetry, TelemetryContext, TelemetryError, TelemetryEvent, TelemetrySink};
pub use time::{to_epoch_timestamp, Timestamp};
