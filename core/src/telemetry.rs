//! Best-effort usage telemetry.
//!
//! # Design
//! Each client owns one `TelemetryContext`, built at construction and never
//! mutated afterwards; every event carries its properties. Events go to a
//! `TelemetrySink` on a spawned task, so the caller never waits on the
//! collector and never sees its failures. Errors are logged at debug level
//! and dropped. Without a tokio runtime there is nowhere to spawn, and the
//! event is dropped as well.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Failures of the telemetry side channel. Never returned to API callers.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("collector request failed: {0}")]
    Transport(String),

    #[error("collector rejected event with status {0}")]
    Rejected(u16),
}

impl From<reqwest::Error> for TelemetryError {
    fn from(err: reqwest::Error) -> Self {
        TelemetryError::Transport(err.to_string())
    }
}

/// Payload posted to the collector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryEvent {
    pub event: String,
    pub properties: Map<String, Value>,
}

/// Properties attached to every event of one client.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryContext {
    properties: Map<String, Value>,
}

impl TelemetryContext {
    pub fn new(distinct_id: &str) -> Self {
        let mut properties = Map::new();
        properties.insert("distinct_id".to_string(), Value::from(distinct_id));
        properties.insert("initializedAt".to_string(), Value::from(Utc::now().to_rfc3339()));
        Self { properties }
    }

    /// Add a property before the context is handed to a client.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// Build an event. Event properties win over context properties.
    pub fn event(&self, name: &str, properties: Map<String, Value>) -> TelemetryEvent {
        let mut merged = self.properties.clone();
        merged.extend(properties);
        TelemetryEvent {
            event: name.to_string(),
            properties: merged,
        }
    }
}

/// Destination for telemetry events.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    async fn send(&self, event: TelemetryEvent) -> Result<(), TelemetryError>;
}

/// Posts events as JSON to a collector URL.
pub struct HttpCollector {
    http: reqwest::Client,
    url: String,
}

impl HttpCollector {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[async_trait]
impl TelemetrySink for HttpCollector {
    async fn send(&self, event: TelemetryEvent) -> Result<(), TelemetryError> {
        let response = self.http.post(&self.url).json(&event).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TelemetryError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}

/// Handle held by the client. Cheap to clone.
#[derive(Clone)]
pub struct Telemetry {
    context: Arc<TelemetryContext>,
    sink: Option<Arc<dyn TelemetrySink>>,
}

impl Telemetry {
    pub fn new(context: TelemetryContext, sink: Arc<dyn TelemetrySink>) -> Self {
        Self {
            context: Arc::new(context),
            sink: Some(sink),
        }
    }

    pub fn disabled() -> Self {
        Self {
            context: Arc::new(TelemetryContext {
                properties: Map::new(),
            }),
            sink: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn context(&self) -> &TelemetryContext {
        &self.context
    }

    /// Fire and forget.
    pub fn track(&self, name: &str, properties: Map<String, Value>) {
        let Some(sink) = &self.sink else {
            return;
        };
        let event = self.context.event(name, properties);

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!(event = %event.event, "no async runtime, telemetry event dropped");
            return;
        };

        let sink = Arc::clone(sink);
        runtime.spawn(async move {
            let name = event.event.clone();
            if let Err(e) = sink.send(event).await {
                debug!(event = %name, error = %e, "telemetry event dropped");
            }
        });
    }
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telemetry")
            .field("enabled", &self.is_enabled())
            .field("context", &self.context)
            .finish()
    }
}
