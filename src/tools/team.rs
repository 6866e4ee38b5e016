use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

use super::schema::{SchemaBuilder, no_params};
use super::{IntoToolResponse, Tool, ToolResponse, decode_field, field};
use crate::error::McpResult;
use crate::mcp::types::ToolInputSchema;
use crate::slack::requests::{DndInfo, DndTeamInfo, EmojiList, TeamInfo, TeamProfile};
use crate::slack::types::null_as_default;
use crate::utils::{non_blank, non_empty, parse_params};

slack_tools!(
    TeamInfoTool,
    TeamProfileTool,
    ListEmojiTool,
    DndInfoTool,
    TeamDndInfoTool,
);

#[derive(Debug, Deserialize)]
struct DndInfoParams {
    user: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TeamDndInfoParams {
    users: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SlackTeam {
    id: Option<String>,
    name: Option<String>,
    domain: Option<String>,
    email_domain: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    icon: Map<String, Value>,
    enterprise_id: Option<String>,
    enterprise_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SlackTeamProfile {
    #[serde(deserialize_with = "null_as_default")]
    fields: Vec<Value>,
}

#[async_trait]
impl Tool for TeamInfoTool {
    fn name(&self) -> &'static str {
        "get_slack_team_info"
    }

    fn description(&self) -> &str {
        "Get information about the Slack workspace/team"
    }

    fn input_schema(&self) -> ToolInputSchema {
        no_params()
    }

    async fn execute(&self, _params: Value) -> McpResult<Value> {
        let data = self
            .slack_client
            .send(&TeamInfo {})
            .await
            .into_data("Failed to get team info")?;

        let team: SlackTeam = decode_field(&data, "team")?;
        ToolResponse::data(json!({
            "id": team.id,
            "name": team.name,
            "domain": team.domain,
            "email_domain": team.email_domain,
            "icon": team.icon,
            "enterprise_id": team.enterprise_id,
            "enterprise_name": team.enterprise_name,
        }))
        .into_response()
    }
}

#[async_trait]
impl Tool for TeamProfileTool {
    fn name(&self) -> &'static str {
        "get_slack_team_profile"
    }

    fn description(&self) -> &str {
        "Get team profile fields"
    }

    fn input_schema(&self) -> ToolInputSchema {
        no_params()
    }

    async fn execute(&self, _params: Value) -> McpResult<Value> {
        let data = self
            .slack_client
            .send(&TeamProfile {})
            .await
            .into_data("Failed to get team profile")?;

        let profile: SlackTeamProfile = decode_field(&data, "profile")?;
        ToolResponse::data(json!({ "fields": profile.fields })).into_response()
    }
}

#[async_trait]
impl Tool for ListEmojiTool {
    fn name(&self) -> &'static str {
        "list_slack_emoji"
    }

    fn description(&self) -> &str {
        "List custom emoji for the team"
    }

    fn input_schema(&self) -> ToolInputSchema {
        no_params()
    }

    async fn execute(&self, _params: Value) -> McpResult<Value> {
        let data = self
            .slack_client
            .send(&EmojiList {})
            .await
            .into_data("Failed to list emoji")?;

        let emoji: BTreeMap<String, Value> = decode_field(&data, "emoji")?;
        let emoji: Vec<Value> = emoji
            .into_iter()
            .map(|(name, url)| json!({ "name": name, "url": url }))
            .collect();

        ToolResponse::data(json!({ "emoji": emoji })).into_response()
    }
}

#[async_trait]
impl Tool for DndInfoTool {
    fn name(&self) -> &'static str {
        "get_slack_dnd_info"
    }

    fn description(&self) -> &str {
        "Get Do Not Disturb information for a user"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .string("user", "User ID (defaults to the bot user)")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: DndInfoParams = parse_params(params)?;

        let data = self
            .slack_client
            .send(&DndInfo {
                user: non_blank(params.user),
            })
            .await
            .into_data("Failed to get DND info")?;

        let flag = |key: &str| data.get(key).and_then(Value::as_bool).unwrap_or(false);

        ToolResponse::data(json!({
            "dnd_enabled": flag("dnd_enabled"),
            "next_dnd_start_ts": field(&data, "next_dnd_start_ts"),
            "next_dnd_end_ts": field(&data, "next_dnd_end_ts"),
            "snooze_enabled": flag("snooze_enabled"),
            "snooze_endtime": field(&data, "snooze_endtime"),
            "snooze_remaining": field(&data, "snooze_remaining"),
        }))
        .into_response()
    }
}

#[async_trait]
impl Tool for TeamDndInfoTool {
    fn name(&self) -> &'static str {
        "get_slack_team_dnd_info"
    }

    fn description(&self) -> &str {
        "Get Do Not Disturb information for multiple users"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .string_list("users", "User IDs to look up")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: TeamDndInfoParams = parse_params(params)?;

        let data = self
            .slack_client
            .send(&DndTeamInfo {
                users: non_empty(params.users),
            })
            .await
            .into_data("Failed to get team DND info")?;

        let users: Map<String, Value> = decode_field(&data, "users")?;
        ToolResponse::data(json!({ "users": users })).into_response()
    }
}
