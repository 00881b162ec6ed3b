use crate::config::ConfigError;
use crate::stats_collector::{StatsKind, StatusReply};
use thiserror::Error;

/// Message returned to the slash-command caller when a request cannot be dispatched
pub const MISSING_INPUT_MESSAGE: &str =
    "The statistics service cannot process this request: missing input.";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Webhook error: {0}")]
    Webhook(#[from] WebhookError),

    #[error("Statistics request error: {0}")]
    Stats(#[from] StatsError),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Errors reported synchronously to the caller of a stats entry point
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("{}", MISSING_INPUT_MESSAGE)]
    MissingInput,

    #[error("Invalid {operation} invocation: callback is missing")]
    InvalidInvocation { operation: &'static str },

    #[error("No async runtime available: {0}")]
    NoRuntime(String),
}

impl StatsError {
    /// Status code carried in the error reply
    pub fn code(&self) -> u16 {
        500
    }

    /// Render the error as the `{code, message}` reply handed to the slash-command caller
    pub fn status(&self) -> StatusReply {
        StatusReply {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum LookupError {
    #[error("No {kind} vertex found for {name}")]
    NotFound { kind: StatsKind, name: String },

    #[error("Graph query failed: {0}")]
    QueryFailed(String),

    #[error("Invalid graph response: {0}")]
    InvalidResponse(String),
}

#[derive(Error, Debug, Clone)]
pub enum WebhookError {
    #[error("Invalid response URL: {0}")]
    InvalidUrl(String),

    #[error("Webhook request failed: {0}")]
    RequestFailed(String),

    #[error("Webhook rejected payload with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Payload serialization failed: {0}")]
    Serialization(String),
}
