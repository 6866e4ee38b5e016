use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::McpError;
use crate::slack::SlackClient;
use crate::tools::{
    Tool, auth, bookmarks, channels, files, messages, pins, reactions, team, usergroups, users,
};

use super::types::{CallToolResult, Tool as McpTool, ToolContent};

pub struct RequestHandler {
    tools: HashMap<&'static str, Box<dyn Tool>>,
}

macro_rules! register_tool {
    ($tools:expr, $tool:expr) => {{
        let tool = $tool;
        $tools.insert(tool.name(), Box::new(tool) as Box<dyn Tool>);
    }};
}

impl RequestHandler {
    pub fn new(slack_client: Arc<SlackClient>) -> Self {
        let mut tools: HashMap<&'static str, Box<dyn Tool>> = HashMap::new();
        let client = || slack_client.clone();

        // Auth
        register_tool!(tools, auth::TestAuthTool::new(client()));

        // Messages
        register_tool!(tools, messages::SendMessageTool::new(client()));
        register_tool!(tools, messages::UpdateMessageTool::new(client()));
        register_tool!(tools, messages::DeleteMessageTool::new(client()));
        register_tool!(tools, messages::ScheduleMessageTool::new(client()));
        register_tool!(tools, messages::ChannelHistoryTool::new(client()));
        register_tool!(tools, messages::ThreadRepliesTool::new(client()));

        // Channels
        register_tool!(tools, channels::ListChannelsTool::new(client()));
        register_tool!(tools, channels::ChannelInfoTool::new(client()));
        register_tool!(tools, channels::CreateChannelTool::new(client()));
        register_tool!(tools, channels::JoinChannelTool::new(client()));
        register_tool!(tools, channels::LeaveChannelTool::new(client()));
        register_tool!(tools, channels::InviteToChannelTool::new(client()));
        register_tool!(tools, channels::KickFromChannelTool::new(client()));
        register_tool!(tools, channels::SetChannelTopicTool::new(client()));
        register_tool!(tools, channels::SetChannelPurposeTool::new(client()));
        register_tool!(tools, channels::ArchiveChannelTool::new(client()));
        register_tool!(tools, channels::UnarchiveChannelTool::new(client()));

        // Users
        register_tool!(tools, users::ListUsersTool::new(client()));
        register_tool!(tools, users::UserInfoTool::new(client()));
        register_tool!(tools, users::UserProfileTool::new(client()));
        register_tool!(tools, users::SetPresenceTool::new(client()));

        // Files
        register_tool!(tools, files::UploadFileTool::new(client()));
        register_tool!(tools, files::ListFilesTool::new(client()));
        register_tool!(tools, files::FileInfoTool::new(client()));
        register_tool!(tools, files::DeleteFileTool::new(client()));

        // Reactions and pins
        register_tool!(tools, reactions::AddReactionTool::new(client()));
        register_tool!(tools, reactions::RemoveReactionTool::new(client()));
        register_tool!(tools, reactions::GetReactionsTool::new(client()));
        register_tool!(tools, pins::PinMessageTool::new(client()));
        register_tool!(tools, pins::UnpinMessageTool::new(client()));
        register_tool!(tools, pins::ListPinsTool::new(client()));

        // Bookmarks
        register_tool!(tools, bookmarks::AddBookmarkTool::new(client()));
        register_tool!(tools, bookmarks::RemoveBookmarkTool::new(client()));
        register_tool!(tools, bookmarks::ListBookmarksTool::new(client()));

        // Usergroups
        register_tool!(tools, usergroups::CreateUsergroupTool::new(client()));
        register_tool!(tools, usergroups::ListUsergroupsTool::new(client()));
        register_tool!(tools, usergroups::UpdateUsergroupTool::new(client()));
        register_tool!(tools, usergroups::DisableUsergroupTool::new(client()));

        // Team, emoji, do-not-disturb
        register_tool!(tools, team::TeamInfoTool::new(client()));
        register_tool!(tools, team::TeamProfileTool::new(client()));
        register_tool!(tools, team::ListEmojiTool::new(client()));
        register_tool!(tools, team::DndInfoTool::new(client()));
        register_tool!(tools, team::TeamDndInfoTool::new(client()));

        debug!("Registered {} tools", tools.len());
        Self { tools }
    }

    #[cfg(test)]
    fn with_tools(tools: Vec<Box<dyn Tool>>) -> Self {
        Self {
            tools: tools.into_iter().map(|tool| (tool.name(), tool)).collect(),
        }
    }

    /// Tool definitions sorted by name
    pub fn list_tools(&self) -> Vec<McpTool> {
        let mut tool_list: Vec<McpTool> = self
            .tools
            .values()
            .map(|tool| McpTool {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
            })
            .collect();

        tool_list.sort_by(|a, b| a.name.cmp(&b.name));
        tool_list
    }

    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<CallToolResult, McpError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| McpError::NotFound(format!("Tool not found: {}", name)))?;

        debug!("Calling tool {}", name);
        let result = tool.execute(arguments).await?;

        let content = if let Some(text) = result.as_str() {
            vec![ToolContent::Text {
                text: text.to_string(),
            }]
        } else {
            vec![ToolContent::Text {
                text: serde_json::to_string_pretty(&result)?,
            }]
        };

        Ok(CallToolResult { content })
    }
}
