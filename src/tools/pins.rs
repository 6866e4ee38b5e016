use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::schema::SchemaBuilder;
use super::{IntoToolResponse, Tool, ToolResponse, acknowledge, decode_field};
use crate::error::McpResult;
use crate::mcp::types::ToolInputSchema;
use crate::slack::requests::{AddPin, ListPins, RemovePin};
use crate::slack::types::{SlackFile, SlackMessage};
use crate::utils::parse_params;

slack_tools!(PinMessageTool, UnpinMessageTool, ListPinsTool);

#[derive(Debug, Deserialize)]
struct PinParams {
    channel: String,
    message_ts: String,
}

#[derive(Debug, Deserialize)]
struct ListPinsParams {
    channel: String,
}

/// One entry of `pins.list`; exactly one of message or file is expected
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PinnedItem {
    message: Option<SlackMessage>,
    file: Option<SlackFile>,
    created_by: Option<String>,
    created: Option<i64>,
}

impl PinnedItem {
    fn summary(self) -> Option<Value> {
        let mut pin = if let Some(message) = self.message {
            json!({
                "type": "message",
                "timestamp": message.ts,
                "user": message.user,
                "text": message.text,
            })
        } else if let Some(file) = self.file {
            json!({
                "type": "file",
                "file_id": file.id,
                "filename": file.name,
                "title": file.title,
            })
        } else {
            return None;
        };

        pin["pinned_by"] = json!(self.created_by);
        pin["pinned_at"] = json!(self.created);
        Some(pin)
    }
}

fn pin_schema(action: &str) -> ToolInputSchema {
    SchemaBuilder::new()
        .required_string("channel", "Channel ID where the message is located")
        .required_string("message_ts", &format!("Timestamp of the message to {}", action))
        .build()
}

#[async_trait]
impl Tool for PinMessageTool {
    fn name(&self) -> &'static str {
        "pin_slack_message"
    }

    fn description(&self) -> &str {
        "Pin a message to a Slack channel"
    }

    fn input_schema(&self) -> ToolInputSchema {
        pin_schema("pin")
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: PinParams = parse_params(params)?;

        self.slack_client
            .send(&AddPin::new(params.channel, params.message_ts))
            .await
            .into_data("Failed to pin message")?;

        acknowledge("Message pinned successfully")
    }
}

#[async_trait]
impl Tool for UnpinMessageTool {
    fn name(&self) -> &'static str {
        "unpin_slack_message"
    }

    fn description(&self) -> &str {
        "Unpin a message from a Slack channel"
    }

    fn input_schema(&self) -> ToolInputSchema {
        pin_schema("unpin")
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: PinParams = parse_params(params)?;

        self.slack_client
            .send(&RemovePin::new(params.channel, params.message_ts))
            .await
            .into_data("Failed to unpin message")?;

        acknowledge("Message unpinned successfully")
    }
}

#[async_trait]
impl Tool for ListPinsTool {
    fn name(&self) -> &'static str {
        "list_slack_pins"
    }

    fn description(&self) -> &str {
        "List pinned items in a Slack channel"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("channel", "Channel ID to list pins from")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: ListPinsParams = parse_params(params)?;

        let data = self
            .slack_client
            .send(&ListPins::new(params.channel))
            .await
            .into_data("Failed to list pins")?;

        let items: Vec<PinnedItem> = decode_field(&data, "items")?;
        let pins: Vec<Value> = items.into_iter().filter_map(PinnedItem::summary).collect();

        ToolResponse::data(json!({ "pins": pins })).into_response()
    }
}
