//! Access reporting
//!
//! [`AccessReporter::report`] hands each [`AccessEvent`] to a detached task
//! and returns immediately. Delivery failures end in a `warn!` and nowhere
//! else: no retry, no surfacing to the request that caused them.

use crate::error::{GatewayError, TelemetryError};
use crate::event::AccessEvent;
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Destination for access events
#[async_trait]
pub trait AccessSink: Send + Sync + Debug {
    /// Deliver one event
    async fn deliver(&self, event: &AccessEvent) -> Result<(), TelemetryError>;
}

/// Posts events as JSON to a webhook
#[derive(Debug, Clone)]
pub struct WebhookSink {
    client: Client,
    url: Url,
}

impl WebhookSink {
    /// Build a sink with a per-request timeout
    ///
    /// # Errors
    /// `GatewayError::Config` for an unparsable URL or client setup failure.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let url = Url::parse(url)
            .map_err(|e| GatewayError::config(format!("invalid webhook url {url:?}: {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::config(format!("http client: {e}")))?;
        Ok(Self { client, url })
    }

    #[inline]
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl AccessSink for WebhookSink {
    async fn deliver(&self, event: &AccessEvent) -> Result<(), TelemetryError> {
        let response = self.client.post(self.url.clone()).json(event).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TelemetryError::Status(status.as_u16()));
        }
        Ok(())
    }
}

/// Fire-and-forget front for an [`AccessSink`]
#[derive(Debug, Clone)]
pub struct AccessReporter {
    sink: Arc<dyn AccessSink>,
}

impl AccessReporter {
    #[inline]
    #[must_use]
    pub fn new(sink: Arc<dyn AccessSink>) -> Self {
        Self { sink }
    }

    /// Spawn delivery of `event` and return without waiting.
    ///
    /// The handle is only useful to tests; dropping it does not cancel
    /// delivery.
    pub fn report(&self, event: AccessEvent) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            match sink.deliver(&event).await {
                Ok(()) => tracing::debug!(filename = %event.filename, "Access event delivered"),
                Err(error) => tracing::warn!(
                    filename = %event.filename,
                    %error,
                    "Failed to deliver access event"
                ),
            }
        })
    }
}
