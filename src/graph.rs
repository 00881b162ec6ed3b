use crate::error::LookupError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// A vertex returned by the graph client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Vertex {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            properties: Map::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// String value of a property, if present and a string
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

/// Lookups against the social graph (users, channels and their relationships)
#[async_trait::async_trait]
pub trait SocialGraph: Send + Sync {
    /// Resolve the user vertex whose `userName` property equals `user_name`
    async fn fetch_user_info(&self, user_name: &str) -> Result<Vertex, LookupError>;

    /// Collect user statistics and post them to `response_url`
    async fn fetch_user_stats(&self, user: Vertex, response_url: &str) -> Result<(), LookupError>;

    /// Resolve the channel vertex whose `channelName` property equals `channel_name`
    async fn fetch_channel_info(&self, channel_name: &str) -> Result<Vertex, LookupError>;

    /// Collect channel statistics and post them to `response_url`
    async fn fetch_channel_stats(
        &self,
        channel: Vertex,
        response_url: &str,
    ) -> Result<(), LookupError>;
}

/// Lookups against the keyword graph
#[async_trait::async_trait]
pub trait KeywordGraph: Send + Sync {
    /// Find keyword vertices containing `keyword`; an empty list is a valid answer
    async fn fetch_keyword_info(&self, keyword: &str) -> Result<Vec<Vertex>, LookupError>;

    async fn fetch_keyword_stats(
        &self,
        keyword: &str,
        matches: Vec<Vertex>,
        response_url: &str,
    ) -> Result<(), LookupError>;
}

/// Handle to both graph collectors backed by one graph client
#[derive(Clone)]
pub struct GraphCollectors {
    pub social: Arc<dyn SocialGraph>,
    pub keywords: Arc<dyn KeywordGraph>,
}

impl GraphCollectors {
    pub fn new(social: Arc<dyn SocialGraph>, keywords: Arc<dyn KeywordGraph>) -> Self {
        Self { social, keywords }
    }
}

impl std::fmt::Debug for GraphCollectors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphCollectors").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vertex_deserialization_without_properties() {
        let vertex: Vertex = serde_json::from_value(json!({
            "id": "4152",
            "label": "user"
        }))
        .unwrap();

        assert_eq!(vertex.id, "4152");
        assert_eq!(vertex.label, "user");
        assert!(vertex.properties.is_empty());
    }

    #[test]
    fn test_vertex_property_access() {
        let vertex = Vertex::new("8", "channel")
            .with_property("channelName", "general")
            .with_property("memberCount", 42);

        assert_eq!(vertex.property_str("channelName"), Some("general"));
        // non-string properties are not exposed as strings
        assert_eq!(vertex.property_str("memberCount"), None);
        assert_eq!(vertex.property_str("topic"), None);
    }
}
