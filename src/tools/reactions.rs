use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::schema::SchemaBuilder;
use super::{IntoToolResponse, Tool, ToolResponse, acknowledge, decode_field};
use crate::error::McpResult;
use crate::mcp::types::ToolInputSchema;
use crate::slack::requests::{AddReaction, GetReactions, RemoveReaction};
use crate::slack::types::null_as_default;
use crate::utils::parse_params;

slack_tools!(AddReactionTool, RemoveReactionTool, GetReactionsTool);

#[derive(Debug, Deserialize)]
struct ReactionParams {
    channel: String,
    message_ts: String,
    emoji: String,
}

#[derive(Debug, Deserialize)]
struct MessageParams {
    channel: String,
    message_ts: String,
}

/// Slack wants the bare name; callers often pass `:tada:`
fn emoji_name(emoji: &str) -> String {
    emoji.trim().trim_matches(':').to_string()
}

fn reaction_schema(action: &str) -> ToolInputSchema {
    SchemaBuilder::new()
        .required_string("channel", "Channel ID where the message is located")
        .required_string("message_ts", "Timestamp of the message")
        .required_string("emoji", &format!("Emoji name to {} (without colons)", action))
        .build()
}

#[async_trait]
impl Tool for AddReactionTool {
    fn name(&self) -> &'static str {
        "add_slack_reaction"
    }

    fn description(&self) -> &str {
        "Add an emoji reaction to a Slack message"
    }

    fn input_schema(&self) -> ToolInputSchema {
        reaction_schema("add")
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: ReactionParams = parse_params(params)?;
        let name = emoji_name(&params.emoji);

        self.slack_client
            .send(&AddReaction {
                name: name.clone(),
                channel: params.channel,
                timestamp: params.message_ts,
            })
            .await
            .into_data("Failed to add reaction")?;

        acknowledge(format!("Added :{}: reaction successfully", name))
    }
}

#[async_trait]
impl Tool for RemoveReactionTool {
    fn name(&self) -> &'static str {
        "remove_slack_reaction"
    }

    fn description(&self) -> &str {
        "Remove an emoji reaction from a Slack message"
    }

    fn input_schema(&self) -> ToolInputSchema {
        reaction_schema("remove")
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: ReactionParams = parse_params(params)?;
        let name = emoji_name(&params.emoji);

        self.slack_client
            .send(&RemoveReaction {
                name: name.clone(),
                channel: params.channel,
                timestamp: params.message_ts,
            })
            .await
            .into_data("Failed to remove reaction")?;

        acknowledge(format!("Removed :{}: reaction successfully", name))
    }
}

#[async_trait]
impl Tool for GetReactionsTool {
    fn name(&self) -> &'static str {
        "get_slack_reactions"
    }

    fn description(&self) -> &str {
        "Get reactions for a message"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("channel", "Channel ID where the message is located")
            .required_string("message_ts", "Timestamp of the message")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: MessageParams = parse_params(params)?;

        let data = self
            .slack_client
            .send(&GetReactions::new(params.channel, params.message_ts))
            .await
            .into_data("Failed to get reactions")?;

        #[derive(Debug, Default, Deserialize)]
        #[serde(default)]
        struct ReactedMessage {
            #[serde(deserialize_with = "null_as_default")]
            reactions: Vec<Value>,
        }

        let message: ReactedMessage = decode_field(&data, "message")?;
        ToolResponse::data(json!({
            "success": true,
            "reactions": message.reactions,
        }))
        .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slack::client::test_support::sent_forms;
    use crate::tools::test_support::{mount_slack, shared_client};
    use pretty_assertions::assert_eq;
    use wiremock::MockServer;

    #[test]
    fn test_emoji_name_strips_colons() {
        assert_eq!(emoji_name(":thumbsup:"), "thumbsup");
        assert_eq!(emoji_name("tada"), "tada");
    }

    #[tokio::test]
    async fn test_add_reaction_maps_params() {
        let server = MockServer::start().await;
        mount_slack(&server, "reactions.add", json!({"ok": true})).await;

        let result = AddReactionTool::new(shared_client(&server))
            .execute(json!({"channel": "C1", "message_ts": "1.5", "emoji": ":tada:"}))
            .await
            .unwrap();

        assert_eq!(result["message"], "Added :tada: reaction successfully");
        let form = &sent_forms(&server, "/reactions.add").await[0];
        assert_eq!(form["name"], "tada");
        assert_eq!(form["timestamp"], "1.5");
        assert_eq!(form["channel"], "C1");
    }

    #[tokio::test]
    async fn test_remove_reaction_failure() {
        let server = MockServer::start().await;
        mount_slack(&server, "reactions.remove", json!({"ok": false, "error": "no_reaction"}))
            .await;

        let err = RemoveReactionTool::new(shared_client(&server))
            .execute(json!({"channel": "C1", "message_ts": "1.5", "emoji": "tada"}))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to remove reaction: no_reaction");
    }

    #[tokio::test]
    async fn test_get_reactions() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "reactions.get",
            json!({
                "ok": true,
                "type": "message",
                "message": {"ts": "1.5", "reactions": [{"name": "eyes", "count": 2, "users": ["U1", "U2"]}]}
            }),
        )
        .await;

        let result = GetReactionsTool::new(shared_client(&server))
            .execute(json!({"channel": "C1", "message_ts": "1.5"}))
            .await
            .unwrap();

        assert_eq!(
            result,
            json!({
                "success": true,
                "reactions": [{"name": "eyes", "count": 2, "users": ["U1", "U2"]}]
            })
        );
    }
}
