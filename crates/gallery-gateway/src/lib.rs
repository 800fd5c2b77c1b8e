//! Gallery Gateway - image access gateway
//!
//! Serves gallery images from a local directory and reports every image
//! request to a webhook:
//! - Resolves `/view-image/{filename}` against the image root, refusing
//!   anything that could leave it
//! - Builds an [`AccessEvent`] (filename, caller IP, user agent, timestamp)
//!   and hands it to a detached task; the response never waits on it
//! - Streams the file with its inferred content type, or answers 404
//!
//! # Example
//!
//! ```rust,ignore
//! use gallery_gateway::{server, Gateway, GatewayConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::new().apply_env()?;
//! let gateway = Gateway::new(config)?;
//! server::serve(gateway.into()).await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod routes;
pub mod server;
pub mod store;
pub mod telemetry;

pub use config::{GatewayConfig, DEFAULT_CSP};
pub use error::{GatewayError, ResolveError, TelemetryError};
pub use event::AccessEvent;
pub use routes::{routes, NOT_FOUND_BODY};
pub use store::ImageStore;
pub use telemetry::{AccessReporter, AccessSink, WebhookSink};

use std::sync::Arc;
use warp::http::HeaderValue;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything a request needs, built once from a [`GatewayConfig`]
#[derive(Debug)]
pub struct Gateway {
    config: GatewayConfig,
    store: ImageStore,
    reporter: AccessReporter,
    csp_header: HeaderValue,
}

impl Gateway {
    /// Gateway reporting to the configured webhook
    ///
    /// # Errors
    /// - `GatewayError::Config` for an invalid webhook URL or CSP value
    /// - `GatewayError::Io` if the image directory is unusable
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let sink = WebhookSink::new(&config.webhook_url, config.webhook_timeout())?;
        Self::with_sink(config, Arc::new(sink))
    }

    /// Gateway reporting to an arbitrary sink
    ///
    /// # Errors
    /// Same as [`Gateway::new`], minus webhook URL validation.
    pub fn with_sink(config: GatewayConfig, sink: Arc<dyn AccessSink>) -> Result<Self, GatewayError> {
        let store = ImageStore::new(&config.image_dir)?;
        let csp_header = HeaderValue::from_str(&config.content_security_policy)
            .map_err(|e| GatewayError::config(format!("invalid content security policy: {e}")))?;

        tracing::info!(
            image_dir = %store.root().display(),
            webhook = %config.webhook_url,
            trust_proxy = config.trust_proxy,
            "Gateway configured"
        );

        Ok(Self {
            config,
            store,
            reporter: AccessReporter::new(sink),
            csp_header,
        })
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    #[inline]
    #[must_use]
    pub fn reporter(&self) -> &AccessReporter {
        &self.reporter
    }

    #[inline]
    #[must_use]
    pub fn csp_header(&self) -> &HeaderValue {
        &self.csp_header
    }
}
