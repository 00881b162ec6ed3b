use crate::config::Config;
use crate::error::{ServiceError, StatsError};
use crate::graph::GraphCollectors;
use crate::slack::{ResponseSender, SlackWebhook};
use crate::stats_collector::lookup::run_lookup;
use crate::stats_collector::request::{LookupRequest, StatsKind, StatusReply};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, error, info};

/// Result handed to an acknowledgment callback
pub type AckResult = Result<StatusReply, StatsError>;

/// Boxed acknowledgment callback, for callers that store or pass callbacks around
pub type AckCallback = Box<dyn FnOnce(AckResult) + Send>;

/// Settings the dispatcher is constructed with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Emit debug traces for lookups
    pub trace_lookups: bool,
}

impl From<&Config> for DispatchConfig {
    fn from(config: &Config) -> Self {
        Self {
            trace_lookups: config.trace_lookups(),
        }
    }
}

/// Collects user, channel and keyword statistics from the Slack social and keyword graphs.
///
/// Every entry point acknowledges the request immediately and resolves the vertex in a
/// spawned task. When the vertex is found the matching collector posts statistics to the
/// response URL; otherwise a warning is posted there instead. The acknowledgment never
/// reflects the outcome of the lookup.
#[derive(Clone)]
pub struct StatsCollector {
    graph: Option<GraphCollectors>,
    responder: Arc<dyn ResponseSender>,
    runtime: Handle,
    config: DispatchConfig,
}

impl StatsCollector {
    /// Create a collector bound to the current Tokio runtime
    pub fn new(
        graph: Option<GraphCollectors>,
        responder: Arc<dyn ResponseSender>,
        config: DispatchConfig,
    ) -> Result<Self, StatsError> {
        let runtime = Handle::try_current().map_err(|e| StatsError::NoRuntime(e.to_string()))?;
        Ok(Self::with_runtime(graph, responder, config, runtime))
    }

    /// Create a collector that posts notices through a Slack webhook built from `config`
    pub fn from_config(graph: GraphCollectors, config: &Config) -> Result<Self, ServiceError> {
        let webhook = SlackWebhook::new(&config.slack())?;
        let dispatch = DispatchConfig::from(config);
        let collector = Self::new(Some(graph), Arc::new(webhook), dispatch)?;

        info!("Stats collector ready (lookup tracing: {})", dispatch.trace_lookups);
        Ok(collector)
    }

    /// Load configuration (see [`Config::load`]) and build a collector from it
    pub fn from_config_file(
        graph: GraphCollectors,
        config_path: Option<PathBuf>,
    ) -> Result<Self, ServiceError> {
        let config = Config::load(config_path)?;
        Self::from_config(graph, &config)
    }

    /// Create a collector that spawns its lookups on `runtime`
    pub fn with_runtime(
        graph: Option<GraphCollectors>,
        responder: Arc<dyn ResponseSender>,
        config: DispatchConfig,
        runtime: Handle,
    ) -> Self {
        Self {
            graph,
            responder,
            runtime,
            config,
        }
    }

    /// Retrieve user statistics; `callback` receives the preliminary status.
    /// The statistics themselves are POSTed to `response_url`.
    pub fn get_user_stats<F>(&self, user_name: &str, response_url: &str, callback: Option<F>)
    where
        F: FnOnce(AckResult),
    {
        self.dispatch_with_callback(StatsKind::User, user_name, response_url, callback);
    }

    /// Retrieve channel statistics; `callback` receives the preliminary status.
    pub fn get_channel_stats<F>(&self, channel_name: &str, response_url: &str, callback: Option<F>)
    where
        F: FnOnce(AckResult),
    {
        self.dispatch_with_callback(StatsKind::Channel, channel_name, response_url, callback);
    }

    /// Retrieve keyword (or phrase) statistics; `callback` receives the preliminary status.
    pub fn get_keyword_stats<F>(&self, keyword: &str, response_url: &str, callback: Option<F>)
    where
        F: FnOnce(AckResult),
    {
        self.dispatch_with_callback(StatsKind::Keyword, keyword, response_url, callback);
    }

    pub fn user_stats(&self, user_name: &str, response_url: &str) -> AckResult {
        self.dispatch(StatsKind::User, user_name, response_url)
    }

    pub fn channel_stats(&self, channel_name: &str, response_url: &str) -> AckResult {
        self.dispatch(StatsKind::Channel, channel_name, response_url)
    }

    pub fn keyword_stats(&self, keyword: &str, response_url: &str) -> AckResult {
        self.dispatch(StatsKind::Keyword, keyword, response_url)
    }

    fn dispatch_with_callback<F>(
        &self,
        kind: StatsKind,
        name: &str,
        response_url: &str,
        callback: Option<F>,
    ) where
        F: FnOnce(AckResult),
    {
        let Some(callback) = callback else {
            error!(
                "{}",
                StatsError::InvalidInvocation {
                    operation: kind.operation()
                }
            );
            return;
        };

        callback(self.dispatch(kind, name, response_url));
    }

    /// Validate the request, spawn its lookup and build the acknowledgment
    fn dispatch(&self, kind: StatsKind, name: &str, response_url: &str) -> AckResult {
        let graph = match self.graph {
            Some(ref graph) if !name.is_empty() && !response_url.is_empty() => graph.clone(),
            _ => return Err(StatsError::MissingInput),
        };

        if self.config.trace_lookups {
            debug!("Fetching vertex information for {} {}", kind, name);
        }

        let request = LookupRequest::new(kind, name, response_url);
        let acknowledgment = request.acknowledgment();

        // Not awaited: the lookup reports through the response URL
        self.runtime.spawn(run_lookup(
            request,
            graph,
            Arc::clone(&self.responder),
            self.config.trace_lookups,
        ));

        Ok(acknowledgment)
    }
}

impl std::fmt::Debug for StatsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsCollector")
            .field("graph", &self.graph)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
