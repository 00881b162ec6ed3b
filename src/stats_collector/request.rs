use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of identifier a stats request is made for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsKind {
    User,
    Channel,
    Keyword,
}

impl StatsKind {
    /// Name of the entry point serving this kind, used in diagnostics
    pub fn operation(&self) -> &'static str {
        match self {
            StatsKind::User => "getUserStats",
            StatsKind::Channel => "getChannelStats",
            StatsKind::Keyword => "getKeywordStats",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            StatsKind::User => "user",
            StatsKind::Channel => "channel",
            StatsKind::Keyword => "keyword",
        }
    }
}

impl fmt::Display for StatsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `{code, message}` reply handed back to the slash-command caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReply {
    pub code: u16,
    pub message: String,
}

/// One stats request, moved into the lookup task that serves it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub kind: StatsKind,
    pub name: String,
    pub response_url: String,
}

impl LookupRequest {
    pub fn new(kind: StatsKind, name: impl Into<String>, response_url: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            response_url: response_url.into(),
        }
    }

    /// Preliminary reply sent before the lookup has resolved
    pub fn acknowledgment(&self) -> StatusReply {
        StatusReply {
            code: 200,
            message: format!(
                "Collecting information about {} _{}_ ...",
                self.kind, self.name
            ),
        }
    }
}
