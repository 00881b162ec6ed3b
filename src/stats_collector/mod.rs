pub mod dispatcher;
mod lookup;
pub mod request;

pub use dispatcher::{AckCallback, AckResult, DispatchConfig, StatsCollector};
pub use request::{LookupRequest, StatsKind, StatusReply};
