use crate::config::SlackConfig;
use crate::error::WebhookError;
use crate::stats_collector::StatsKind;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Visibility of a message posted to a slash-command `response_url`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Ephemeral,
    InChannel,
}

/// Message payload posted to a Slack `response_url`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackResponse {
    pub response_type: ResponseType,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub mrkdwn: bool,
}

impl SlackResponse {
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Ephemeral,
            text: text.into(),
            color: None,
            mrkdwn: true,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Warning shown to the requesting user when no vertex matched
    pub fn not_found(kind: StatsKind) -> Self {
        Self::ephemeral(format!("No information about this {kind} was found."))
            .with_color("warning")
    }
}

/// Delivery of responses to a Slack webhook
#[async_trait::async_trait]
pub trait ResponseSender: Send + Sync {
    async fn send_response(
        &self,
        response: &SlackResponse,
        response_url: &str,
    ) -> Result<(), WebhookError>;
}

/// Posts JSON responses to Slack `response_url` webhooks
#[derive(Debug, Clone)]
pub struct SlackWebhook {
    http_client: Client,
}

impl SlackWebhook {
    pub fn new(config: &SlackConfig) -> Result<Self, WebhookError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs()))
            .user_agent(config.user_agent())
            .build()
            .map_err(|e| {
                WebhookError::RequestFailed(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { http_client })
    }

    /// Parse and check a response URL before anything is sent to it
    pub fn parse_response_url(response_url: &str) -> Result<Url, WebhookError> {
        let url = Url::parse(response_url)
            .map_err(|e| WebhookError::InvalidUrl(format!("{response_url}: {e}")))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(WebhookError::InvalidUrl(format!(
                "{response_url}: unsupported scheme {scheme}"
            ))),
        }
    }
}

#[async_trait::async_trait]
impl ResponseSender for SlackWebhook {
    async fn send_response(
        &self,
        response: &SlackResponse,
        response_url: &str,
    ) -> Result<(), WebhookError> {
        let url = Self::parse_response_url(response_url)?;
        let body = serde_json::to_vec(response)
            .map_err(|e| WebhookError::Serialization(e.to_string()))?;

        debug!("Posting response to {}", url);

        let reply = self
            .http_client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| WebhookError::RequestFailed(e.to_string()))?;

        let status = reply.status();
        if !status.is_success() {
            let body = reply.text().await.unwrap_or_default();
            warn!("Slack rejected response with status {}: {}", status, body);
            return Err(WebhookError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_found_payload_schema() {
        let response = SlackResponse::not_found(StatsKind::User);

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "response_type": "ephemeral",
                "text": "No information about this user was found.",
                "color": "warning",
                "mrkdwn": true
            })
        );
    }

    #[test]
    fn test_not_found_text_per_kind() {
        assert_eq!(
            SlackResponse::not_found(StatsKind::Channel).text,
            "No information about this channel was found."
        );
        assert_eq!(
            SlackResponse::not_found(StatsKind::Keyword).text,
            "No information about this keyword was found."
        );
    }

    #[test]
    fn test_color_omitted_when_unset() {
        let value = serde_json::to_value(SlackResponse::ephemeral("hi")).unwrap();
        assert!(value.get("color").is_none());
        assert_eq!(value["response_type"], "ephemeral");
    }

    #[test]
    fn test_in_channel_serialization() {
        let mut response = SlackResponse::ephemeral("stats");
        response.response_type = ResponseType::InChannel;
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["response_type"], "in_channel");
    }

    #[test]
    fn test_parse_response_url() {
        assert!(
            SlackWebhook::parse_response_url("https://hooks.slack.com/commands/T1/2/abc").is_ok()
        );
        assert!(matches!(
            SlackWebhook::parse_response_url("not a url"),
            Err(WebhookError::InvalidUrl(_))
        ));
        assert!(matches!(
            SlackWebhook::parse_response_url("ftp://hooks.slack.com/x"),
            Err(WebhookError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_webhook_creation_from_config() {
        let config = SlackConfig {
            timeout_secs: Some(3),
            user_agent: Some("test-agent".to_string()),
        };
        assert!(SlackWebhook::new(&config).is_ok());
    }
}
