use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::message_utils::{format_message, unix_to_iso8601};
use super::schema::SchemaBuilder;
use super::{IntoToolResponse, Tool, ToolResponse, cursor_paging, decode_field, field};
use crate::error::McpResult;
use crate::mcp::types::ToolInputSchema;
use crate::slack::requests::{
    ConversationHistory, ConversationReplies, DeleteMessage, PostMessage, ScheduleMessage,
    UpdateMessage,
};
use crate::slack::types::SlackMessage;
use crate::utils::{non_blank, non_empty, parse_params, validate_required_one_of};

slack_tools!(
    SendMessageTool,
    UpdateMessageTool,
    DeleteMessageTool,
    ScheduleMessageTool,
    ChannelHistoryTool,
    ThreadRepliesTool,
);

#[derive(Debug, Deserialize)]
struct SendMessageParams {
    channel: String,
    text: Option<String>,
    blocks: Option<Vec<Value>>,
    attachments: Option<Vec<Value>>,
    thread_ts: Option<String>,
    username: Option<String>,
    icon_emoji: Option<String>,
    icon_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateMessageParams {
    channel: String,
    message_ts: String,
    text: Option<String>,
    blocks: Option<Vec<Value>>,
    attachments: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct DeleteMessageParams {
    channel: String,
    message_ts: String,
}

#[derive(Debug, Deserialize)]
struct ScheduleMessageParams {
    channel: String,
    post_at: i64,
    text: Option<String>,
    blocks: Option<Vec<Value>>,
    attachments: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ChannelHistoryParams {
    channel: String,
    #[serde(default = "history_default_limit")]
    limit: u32,
    cursor: Option<String>,
    latest: Option<String>,
    oldest: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ThreadRepliesParams {
    channel: String,
    thread_ts: String,
    #[serde(default = "replies_default_limit")]
    limit: u32,
    cursor: Option<String>,
}

fn history_default_limit() -> u32 {
    20
}

fn replies_default_limit() -> u32 {
    100
}

fn message_content_schema(builder: SchemaBuilder) -> SchemaBuilder {
    builder
        .string("text", "Message text (required if blocks not provided)")
        .object_list("blocks", "Block Kit blocks for rich formatting")
        .object_list("attachments", "Legacy message attachments")
}

#[async_trait]
impl Tool for SendMessageTool {
    fn name(&self) -> &'static str {
        "send_slack_message"
    }

    fn description(&self) -> &str {
        "Send a message to a Slack channel with optional rich formatting"
    }

    fn input_schema(&self) -> ToolInputSchema {
        message_content_schema(
            SchemaBuilder::new().required_string("channel", "Channel ID or name to send message to"),
        )
        .string("thread_ts", "Timestamp of parent message to reply in thread")
        .string("username", "Custom username for the bot")
        .string("icon_emoji", "Emoji to use as the bot icon")
        .string("icon_url", "URL to an image to use as the bot icon")
        .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: SendMessageParams = parse_params(params)?;

        let text = non_blank(params.text);
        let blocks = non_empty(params.blocks);
        validate_required_one_of(&text, &blocks, "text or blocks")?;

        let request = PostMessage {
            channel: params.channel,
            text,
            blocks,
            attachments: params.attachments,
            thread_ts: params.thread_ts,
            username: params.username,
            icon_emoji: params.icon_emoji,
            icon_url: params.icon_url,
        };

        let data = self
            .slack_client
            .send(&request)
            .await
            .into_data("Failed to send message")?;

        ToolResponse::data(json!({
            "success": true,
            "channel": field(&data, "channel"),
            "timestamp": field(&data, "ts"),
            "message": "Message sent successfully",
        }))
        .into_response()
    }
}

#[async_trait]
impl Tool for UpdateMessageTool {
    fn name(&self) -> &'static str {
        "update_slack_message"
    }

    fn description(&self) -> &str {
        "Update an existing Slack message"
    }

    fn input_schema(&self) -> ToolInputSchema {
        message_content_schema(
            SchemaBuilder::new()
                .required_string("channel", "Channel ID where the message is located")
                .required_string("message_ts", "Timestamp of the message to update"),
        )
        .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: UpdateMessageParams = parse_params(params)?;

        let request = UpdateMessage {
            channel: params.channel,
            ts: params.message_ts,
            text: params.text,
            blocks: params.blocks,
            attachments: params.attachments,
        };

        let data = self
            .slack_client
            .send(&request)
            .await
            .into_data("Failed to update message")?;

        ToolResponse::data(json!({
            "success": true,
            "channel": field(&data, "channel"),
            "timestamp": field(&data, "ts"),
            "message": "Message updated successfully",
        }))
        .into_response()
    }
}

#[async_trait]
impl Tool for DeleteMessageTool {
    fn name(&self) -> &'static str {
        "delete_slack_message"
    }

    fn description(&self) -> &str {
        "Delete a Slack message"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("channel", "Channel ID where the message is located")
            .required_string("message_ts", "Timestamp of the message to delete")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: DeleteMessageParams = parse_params(params)?;

        self.slack_client
            .send(&DeleteMessage {
                channel: params.channel,
                ts: params.message_ts,
            })
            .await
            .into_data("Failed to delete message")?;

        super::acknowledge("Message deleted successfully")
    }
}

#[async_trait]
impl Tool for ScheduleMessageTool {
    fn name(&self) -> &'static str {
        "schedule_slack_message"
    }

    fn description(&self) -> &str {
        "Schedule a message to be sent at a specific time"
    }

    fn input_schema(&self) -> ToolInputSchema {
        message_content_schema(
            SchemaBuilder::new()
                .required_string("channel", "Channel ID to send the message to")
                .required_integer("post_at", "Unix timestamp when the message should be sent"),
        )
        .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: ScheduleMessageParams = parse_params(params)?;

        let text = non_blank(params.text);
        let blocks = non_empty(params.blocks);
        validate_required_one_of(&text, &blocks, "text or blocks")?;

        let requested_post_at = params.post_at;
        let request = ScheduleMessage {
            channel: params.channel,
            post_at: params.post_at,
            text,
            blocks,
            attachments: params.attachments,
        };

        let data = self
            .slack_client
            .send(&request)
            .await
            .into_data("Failed to schedule message")?;

        let post_at = data
            .get("post_at")
            .and_then(Value::as_i64)
            .unwrap_or(requested_post_at);

        ToolResponse::data(json!({
            "success": true,
            "scheduled_message_id": field(&data, "scheduled_message_id"),
            "channel": field(&data, "channel"),
            "post_at": post_at,
            "post_at_datetime": unix_to_iso8601(post_at),
            "message": "Message scheduled successfully",
        }))
        .into_response()
    }
}

#[async_trait]
impl Tool for ChannelHistoryTool {
    fn name(&self) -> &'static str {
        "get_slack_channel_history"
    }

    fn description(&self) -> &str {
        "Get message history from a Slack channel"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("channel", "Channel ID to get history from")
            .integer("limit", "Maximum number of messages to return", 20)
            .string("cursor", "Pagination cursor for next page")
            .string("latest", "End of time range (timestamp)")
            .string("oldest", "Start of time range (timestamp)")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: ChannelHistoryParams = parse_params(params)?;

        let request = ConversationHistory {
            channel: params.channel,
            limit: params.limit,
            cursor: params.cursor,
            latest: params.latest,
            oldest: params.oldest,
        };

        let data = self
            .slack_client
            .send(&request)
            .await
            .into_data("Failed to get channel history")?;

        let messages: Vec<SlackMessage> = decode_field(&data, "messages")?;
        let formatted: Vec<Value> = messages
            .into_iter()
            .map(|msg| format_message(msg, true))
            .collect();
        let (has_more, next_cursor) = cursor_paging(&data)?;

        ToolResponse::paginated(json!({ "messages": formatted }), has_more, next_cursor)
            .into_response()
    }
}

#[async_trait]
impl Tool for ThreadRepliesTool {
    fn name(&self) -> &'static str {
        "get_slack_thread_replies"
    }

    fn description(&self) -> &str {
        "Get replies to a threaded message"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("channel", "Channel ID where the thread is located")
            .required_string("thread_ts", "Timestamp of the parent message")
            .integer("limit", "Maximum number of replies to return", 100)
            .string("cursor", "Pagination cursor for next page")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: ThreadRepliesParams = parse_params(params)?;

        let request = ConversationReplies {
            channel: params.channel,
            ts: params.thread_ts,
            limit: params.limit,
            cursor: params.cursor,
        };

        let data = self
            .slack_client
            .send(&request)
            .await
            .into_data("Failed to get thread replies")?;

        let messages: Vec<SlackMessage> = decode_field(&data, "messages")?;
        let formatted: Vec<Value> = messages
            .into_iter()
            .map(|msg| format_message(msg, false))
            .collect();
        let (has_more, next_cursor) = cursor_paging(&data)?;

        ToolResponse::paginated(json!({ "messages": formatted }), has_more, next_cursor)
            .into_response()
    }
}
