//! Startup orchestration.
//!
//! Builds the one process-wide [`AppConfig`] from loaded configuration:
//! identity, logging, authorization tokens, per-token event writers and
//! the shutdown registry, in dependency order.

use std::io;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;

use crate::config::TrackerConfig;
use crate::events::{
    provision_writers, Consumer, FileWriterFactory, MultiLoggerConsumer, WriterFactory,
};
use crate::geo::Resolver;
use crate::lifecycle::closers::{Closeable, CloserRegistry};
use crate::observability::logging;
use crate::security::TokenTable;

/// Placeholder identity when the OS hostname is unavailable.
const FALLBACK_SERVER_NAME: &str = "unnamed-server";

/// Errors that abort process startup.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The process log sink could not be prepared. Logging is a
    /// precondition for all later diagnostics, so this is fatal.
    #[error("failed to initialize logging: {0}")]
    Logging(#[source] io::Error),

    /// An event writer could not be provisioned for an authorized token.
    /// A missing sink for a valid credential is a misconfiguration.
    #[error("failed to provision event writers: {0}")]
    Provision(#[source] io::Error),
}

/// Process-wide configuration and resources, built once at startup.
///
/// The composition root: the request layer receives it by handle and never
/// mutates it, except for scheduling additional resources for shutdown.
#[derive(Debug)]
pub struct AppConfig {
    server_name: String,
    authority: String,
    public_url: String,
    tokens: TokenTable,
    events_consumer: Arc<MultiLoggerConsumer>,
    geo_resolver: Option<Arc<Resolver>>,
    closers: CloserRegistry,
    // Keeps the non-blocking log worker alive for the process lifetime.
    _log_guard: Option<WorkerGuard>,
}

impl AppConfig {
    /// Bootstrap the process with the production event-writer factory.
    pub fn init(config: &TrackerConfig) -> Result<Arc<Self>, BootstrapError> {
        let factory = FileWriterFactory::from(&config.events);
        Self::init_with_factory(config, &factory)
    }

    /// Bootstrap with a caller-supplied writer factory.
    pub fn init_with_factory(
        config: &TrackerConfig,
        factory: &dyn WriterFactory,
    ) -> Result<Arc<Self>, BootstrapError> {
        let server_name = match hostname::get() {
            Ok(name) => name.to_string_lossy().into_owned(),
            Err(e) => {
                // Logging is not up yet; stderr is all there is.
                eprintln!("Unable to get os hostname ({e}), using '{FALLBACK_SERVER_NAME}'");
                FALLBACK_SERVER_NAME.to_string()
            }
        };

        let log_guard =
            logging::init(&server_name, &config.server.log).map_err(BootstrapError::Logging)?;

        tracing::info!(server_name = %server_name, "Creating new AppConfig");
        if config.server.public_url.is_empty() {
            tracing::info!("Server public url: will be taken from Host header");
        } else {
            tracing::info!(public_url = %config.server.public_url, "Server public url");
        }

        let authority = format!("0.0.0.0:{}", config.server.port);

        let geo_resolver = match Resolver::open(Path::new(&config.geo.maxmind_path)) {
            Ok(resolver) => Some(Arc::new(resolver)),
            Err(e) => {
                tracing::warn!(error = %e, "Run without geo resolver");
                None
            }
        };

        let tokens = TokenTable::from_raw(&config.server.auth);

        let writers = provision_writers(&tokens, factory).map_err(BootstrapError::Provision)?;
        let events_consumer = Arc::new(MultiLoggerConsumer::new(writers));

        let closers = CloserRegistry::new();
        closers.register(events_consumer.clone());

        Ok(Arc::new(Self {
            server_name,
            authority,
            public_url: config.server.public_url.clone(),
            tokens,
            events_consumer,
            geo_resolver,
            closers,
            _log_guard: log_guard,
        }))
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// Bind address for the request layer, always on all interfaces.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Public URL advertised to clients; empty means "derive from the Host
    /// header".
    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    /// Exact-match bearer-token check.
    pub fn is_authorized(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn tokens(&self) -> &TokenTable {
        &self.tokens
    }

    /// Handle for the request layer to hand events to.
    pub fn events_consumer(&self) -> Arc<dyn Consumer> {
        self.events_consumer.clone()
    }

    pub fn geo_resolver(&self) -> Option<&Resolver> {
        self.geo_resolver.as_deref()
    }

    /// Register a resource for release at shutdown.
    pub fn schedule_closing(&self, closer: Arc<dyn Closeable>) {
        self.closers.register(closer);
    }

    /// Ordered shutdown: release every scheduled resource.
    pub fn close(&self) {
        self.closers.close_all();
    }
}
