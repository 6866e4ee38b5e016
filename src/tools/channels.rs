use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::schema::SchemaBuilder;
use super::{IntoToolResponse, Tool, ToolResponse, acknowledge, cursor_paging, decode_field};
use crate::error::{McpError, McpResult};
use crate::mcp::types::ToolInputSchema;
use crate::slack::requests::{
    ArchiveConversation, ConversationInfo, CreateConversation, InviteToConversation,
    JoinConversation, KickFromConversation, LeaveConversation, ListConversations,
    SetConversationPurpose, SetConversationTopic, UnarchiveConversation,
};
use crate::slack::types::SlackChannel;
use crate::utils::{OneOrMany, parse_params};

const DEFAULT_CHANNEL_TYPES: &str = "public_channel,private_channel";

slack_tools!(
    ListChannelsTool,
    ChannelInfoTool,
    CreateChannelTool,
    JoinChannelTool,
    LeaveChannelTool,
    InviteToChannelTool,
    KickFromChannelTool,
    SetChannelTopicTool,
    SetChannelPurposeTool,
    ArchiveChannelTool,
    UnarchiveChannelTool,
);

#[derive(Debug, Deserialize)]
struct ListChannelsParams {
    #[serde(default = "list_default_limit")]
    limit: u32,
    #[serde(default = "default_true")]
    exclude_archived: bool,
    #[serde(default = "default_channel_types")]
    types: String,
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelParams {
    channel: String,
}

#[derive(Debug, Deserialize)]
struct CreateChannelParams {
    name: String,
    #[serde(default)]
    is_private: bool,
}

#[derive(Debug, Deserialize)]
struct InviteParams {
    channel: String,
    users: OneOrMany,
}

#[derive(Debug, Deserialize)]
struct KickParams {
    channel: String,
    user: String,
}

#[derive(Debug, Deserialize)]
struct TopicParams {
    channel: String,
    topic: String,
}

#[derive(Debug, Deserialize)]
struct PurposeParams {
    channel: String,
    purpose: String,
}

fn list_default_limit() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

fn default_channel_types() -> String {
    DEFAULT_CHANNEL_TYPES.to_string()
}

fn channel_summary(channel: &SlackChannel) -> Value {
    json!({
        "id": channel.id,
        "name": channel.name,
        "is_private": channel.is_private,
        "is_member": channel.is_member,
        "topic": channel.topic.value,
        "purpose": channel.purpose.value,
        "member_count": channel.num_members,
        "created": channel.created,
        "is_archived": channel.is_archived,
    })
}

fn channel_schema(description: &str) -> ToolInputSchema {
    SchemaBuilder::new()
        .required_string("channel", description)
        .build()
}

#[async_trait]
impl Tool for ListChannelsTool {
    fn name(&self) -> &'static str {
        "list_slack_channels"
    }

    fn description(&self) -> &str {
        "List Slack channels in the workspace"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .integer("limit", "Maximum number of channels to return (Slack accepts 1-1000)", 100)
            .boolean("exclude_archived", "Whether to exclude archived channels", true)
            .string(
                "types",
                "Comma-separated channel types: public_channel, private_channel, mpim, im",
            )
            .string("cursor", "Pagination cursor for next page")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: ListChannelsParams = parse_params(params)?;

        let request = ListConversations {
            exclude_archived: params.exclude_archived,
            limit: params.limit,
            types: params.types,
            cursor: params.cursor,
        };

        let data = self
            .slack_client
            .send(&request)
            .await
            .into_data("Failed to list channels")?;

        let channels: Vec<SlackChannel> = decode_field(&data, "channels")?;
        let channels: Vec<Value> = channels.iter().map(channel_summary).collect();
        let (has_more, next_cursor) = cursor_paging(&data)?;

        ToolResponse::paginated(json!({ "channels": channels }), has_more, next_cursor)
            .into_response()
    }
}

#[async_trait]
impl Tool for ChannelInfoTool {
    fn name(&self) -> &'static str {
        "get_slack_channel_info"
    }

    fn description(&self) -> &str {
        "Get detailed information about a specific Slack channel"
    }

    fn input_schema(&self) -> ToolInputSchema {
        channel_schema("Channel ID to get information about")
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: ChannelParams = parse_params(params)?;

        let data = self
            .slack_client
            .send(&ConversationInfo::new(params.channel))
            .await
            .into_data("Failed to get channel info")?;

        let channel: SlackChannel = decode_field(&data, "channel")?;
        let mut result = channel_summary(&channel);
        result["creator"] = json!(channel.creator);

        ToolResponse::data(result).into_response()
    }
}

#[async_trait]
impl Tool for CreateChannelTool {
    fn name(&self) -> &'static str {
        "create_slack_channel"
    }

    fn description(&self) -> &str {
        "Create a new Slack channel"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("name", "Name of the channel to create (without #)")
            .boolean("is_private", "Whether to create a private channel", false)
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: CreateChannelParams = parse_params(params)?;
        let name = params.name.trim_start_matches('#').to_string();

        let data = self
            .slack_client
            .send(&CreateConversation {
                name: name.clone(),
                is_private: params.is_private,
            })
            .await
            .into_data("Failed to create channel")?;

        let channel: SlackChannel = decode_field(&data, "channel")?;
        ToolResponse::data(json!({
            "success": true,
            "channel_id": channel.id,
            "channel_name": channel.name,
            "is_private": channel.is_private,
            "message": format!("Channel #{} created successfully", name),
        }))
        .into_response()
    }
}

#[async_trait]
impl Tool for JoinChannelTool {
    fn name(&self) -> &'static str {
        "join_slack_channel"
    }

    fn description(&self) -> &str {
        "Join a Slack channel"
    }

    fn input_schema(&self) -> ToolInputSchema {
        channel_schema("Channel ID to join")
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: ChannelParams = parse_params(params)?;

        self.slack_client
            .send(&JoinConversation::new(params.channel.as_str()))
            .await
            .into_data("Failed to join channel")?;

        acknowledge(format!("Successfully joined channel {}", params.channel))
    }
}

#[async_trait]
impl Tool for LeaveChannelTool {
    fn name(&self) -> &'static str {
        "leave_slack_channel"
    }

    fn description(&self) -> &str {
        "Leave a Slack channel"
    }

    fn input_schema(&self) -> ToolInputSchema {
        channel_schema("Channel ID to leave")
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: ChannelParams = parse_params(params)?;

        self.slack_client
            .send(&LeaveConversation::new(params.channel.as_str()))
            .await
            .into_data("Failed to leave channel")?;

        acknowledge(format!("Successfully left channel {}", params.channel))
    }
}

#[async_trait]
impl Tool for InviteToChannelTool {
    fn name(&self) -> &'static str {
        "invite_to_slack_channel"
    }

    fn description(&self) -> &str {
        "Invite users to a Slack channel"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("channel", "Channel ID to invite users to")
            .one_or_many("users", "User ID or list of user IDs to invite", true)
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: InviteParams = parse_params(params)?;

        let users = params.users.into_vec();
        if users.is_empty() {
            return Err(McpError::InvalidParameter(
                "users must contain at least one user ID".to_string(),
            ));
        }

        self.slack_client
            .send(&InviteToConversation {
                channel: params.channel.clone(),
                users,
            })
            .await
            .into_data("Failed to invite users to channel")?;

        acknowledge(format!(
            "Users invited to channel {} successfully",
            params.channel
        ))
    }
}

#[async_trait]
impl Tool for KickFromChannelTool {
    fn name(&self) -> &'static str {
        "kick_from_slack_channel"
    }

    fn description(&self) -> &str {
        "Remove a user from a Slack channel"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("channel", "Channel ID to remove the user from")
            .required_string("user", "User ID to remove")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: KickParams = parse_params(params)?;

        self.slack_client
            .send(&KickFromConversation {
                channel: params.channel.clone(),
                user: params.user,
            })
            .await
            .into_data("Failed to remove user from channel")?;

        acknowledge(format!(
            "User removed from channel {} successfully",
            params.channel
        ))
    }
}

#[async_trait]
impl Tool for SetChannelTopicTool {
    fn name(&self) -> &'static str {
        "set_slack_channel_topic"
    }

    fn description(&self) -> &str {
        "Set the topic for a Slack channel"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("channel", "Channel ID to set topic for")
            .required_string("topic", "New topic text")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: TopicParams = parse_params(params)?;

        self.slack_client
            .send(&SetConversationTopic {
                channel: params.channel,
                topic: params.topic,
            })
            .await
            .into_data("Failed to set channel topic")?;

        acknowledge("Channel topic updated successfully")
    }
}

#[async_trait]
impl Tool for SetChannelPurposeTool {
    fn name(&self) -> &'static str {
        "set_slack_channel_purpose"
    }

    fn description(&self) -> &str {
        "Set the purpose for a Slack channel"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("channel", "Channel ID to set purpose for")
            .required_string("purpose", "New purpose text")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: PurposeParams = parse_params(params)?;

        self.slack_client
            .send(&SetConversationPurpose {
                channel: params.channel,
                purpose: params.purpose,
            })
            .await
            .into_data("Failed to set channel purpose")?;

        acknowledge("Channel purpose updated successfully")
    }
}

#[async_trait]
impl Tool for ArchiveChannelTool {
    fn name(&self) -> &'static str {
        "archive_slack_channel"
    }

    fn description(&self) -> &str {
        "Archive a Slack channel"
    }

    fn input_schema(&self) -> ToolInputSchema {
        channel_schema("Channel ID to archive")
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: ChannelParams = parse_params(params)?;

        self.slack_client
            .send(&ArchiveConversation::new(params.channel.as_str()))
            .await
            .into_data("Failed to archive channel")?;

        acknowledge(format!("Channel {} archived successfully", params.channel))
    }
}

#[async_trait]
impl Tool for UnarchiveChannelTool {
    fn name(&self) -> &'static str {
        "unarchive_slack_channel"
    }

    fn description(&self) -> &str {
        "Unarchive a Slack channel"
    }

    fn input_schema(&self) -> ToolInputSchema {
        channel_schema("Channel ID to unarchive")
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: ChannelParams = parse_params(params)?;

        self.slack_client
            .send(&UnarchiveConversation::new(params.channel.as_str()))
            .await
            .into_data("Failed to unarchive channel")?;

        acknowledge(format!("Channel {} unarchived successfully", params.channel))
    }
}
