use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, warn};

use super::methods::SlackMethod;
use super::requests::SlackRequest;
use super::response::SlackResponse;
use crate::config::Config;
use crate::error::{McpError, McpResult};

pub const BOT_TOKEN_PREFIX: &str = "xoxb-";

/// Bot-token Slack Web API client.
///
/// Every call is a single POST with no retry. Failures come back as
/// `SlackResponse::Failure`, never as `Err`.
#[derive(Clone)]
pub struct SlackClient {
    pub(super) http: reqwest::Client,
    pub(super) base_url: String,
    token: String,
}

impl fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackClient")
            .field("base_url", &self.base_url)
            .field("token", &"xoxb-***")
            .finish()
    }
}

impl SlackClient {
    pub fn new(config: &Config) -> McpResult<Self> {
        let token = config.slack.bot_token.clone();
        if !token.starts_with(BOT_TOKEN_PREFIX) {
            return Err(McpError::Configuration(format!(
                "Bot token must start with '{}'",
                BOT_TOKEN_PREFIX
            )));
        }

        let base_url = normalize_base_url(&config.slack.api_base_url)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.connection.timeout_seconds))
            .pool_max_idle_per_host(config.connection.max_idle_per_host.max(0) as usize)
            .pool_idle_timeout(Duration::from_secs(
                config.connection.pool_idle_timeout_seconds,
            ))
            .user_agent(concat!("slack-bot-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| McpError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// Call the method a typed request is bound to
    pub async fn send<R: SlackRequest>(&self, request: &R) -> SlackResponse {
        self.call(R::METHOD, request).await
    }

    /// Invoke one Slack method with the given parameters
    pub async fn call<P: Serialize + ?Sized>(&self, method: SlackMethod, params: &P) -> SlackResponse {
        let body = match encode_form(params)
            .and_then(|form| serde_urlencoded::to_string(form).map_err(|e| McpError::Internal(e.to_string())))
        {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to encode parameters for {}: {}", method, e);
                return SlackResponse::failure(e.to_string());
            }
        };

        debug!("Calling Slack API method {}", method);

        let response = self
            .http
            .post(self.method_url(method))
            .bearer_auth(&self.token)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded; charset=utf-8",
            )
            .body(body)
            .send()
            .await;

        match response {
            Ok(response) => Self::decode(method, response).await,
            Err(e) => {
                error!("Unexpected error in {}: {}", method, e);
                SlackResponse::failure(e.to_string())
            }
        }
    }

    async fn decode(method: SlackMethod, response: reqwest::Response) -> SlackResponse {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("HTTP {}: {}", status, body.trim());
            error!("Slack API request failed in {}: {}", method, message);
            return SlackResponse::failure(message);
        }

        let payload: Value = match response.json().await {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to decode response from {}: {}", method, e);
                return SlackResponse::failure(e.to_string());
            }
        };

        let response = SlackResponse::from_payload(payload);
        if let Some(error) = response.error() {
            error!("Slack API Error in {}: {}", method, error);
        } else if let Some(warning) = response.warning() {
            warn!("Slack API warning in {}: {}", method, warning);
        }
        response
    }

    pub(super) fn method_url(&self, method: SlackMethod) -> String {
        format!("{}/{}", self.base_url, method.as_str())
    }
}

/// Flatten request parameters into Slack form fields.
///
/// Nulls are dropped, scalars are stringified, and nested values (Block Kit
/// blocks, attachments, file lists) are sent as JSON strings.
pub fn encode_form<P: Serialize + ?Sized>(params: &P) -> McpResult<Vec<(String, String)>> {
    let map = match serde_json::to_value(params)? {
        Value::Object(map) => map,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(McpError::Internal(format!(
                "Slack parameters must be an object, got {}",
                other
            )));
        }
    };

    let mut form = Vec::with_capacity(map.len());
    for (key, value) in map {
        let encoded = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            nested => serde_json::to_string(&nested)?,
        };
        form.push((key, encoded));
    }
    Ok(form)
}

fn normalize_base_url(endpoint: &str) -> McpResult<String> {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() {
        return Err(McpError::Configuration(
            "Slack API base URL must not be empty".to_string(),
        ));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
