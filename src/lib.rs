//! Dispatch layer for Slack `/about` statistics commands.
//!
//! Incoming user, channel and keyword requests are acknowledged immediately while the
//! matching graph vertex is resolved in the background; results and not-found notices
//! are posted to the command's `response_url`.

pub mod config;
pub mod error;
pub mod graph;
pub mod logging;
pub mod slack;
pub mod stats_collector;

pub use config::Config;
pub use error::{LookupError, ServiceError, StatsError, WebhookError};
pub use graph::{GraphCollectors, KeywordGraph, SocialGraph, Vertex};
pub use slack::{ResponseSender, ResponseType, SlackResponse, SlackWebhook};
pub use stats_collector::{
    AckCallback, AckResult, DispatchConfig, StatsCollector, StatsKind, StatusReply,
};
