use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::schema::SchemaBuilder;
use super::{IntoToolResponse, Tool, ToolResponse, acknowledge, cursor_paging, decode_field};
use crate::error::McpResult;
use crate::mcp::types::ToolInputSchema;
use crate::slack::requests::{ListUsers, Presence, SetPresence, UserInfo, UserProfile};
use crate::slack::types::{SlackUser, SlackUserProfile};
use crate::utils::parse_params;

slack_tools!(ListUsersTool, UserInfoTool, UserProfileTool, SetPresenceTool);

#[derive(Debug, Deserialize)]
struct ListUsersParams {
    #[serde(default = "list_default_limit")]
    limit: u32,
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserParams {
    user: String,
}

#[derive(Debug, Deserialize)]
struct PresenceParams {
    presence: Presence,
}

fn list_default_limit() -> u32 {
    100
}

fn user_summary(user: &SlackUser) -> Value {
    json!({
        "id": user.id,
        "name": user.name,
        "real_name": user.real_name,
        "display_name": user.profile.display_name,
        "email": user.profile.email,
        "is_bot": user.is_bot,
        "is_admin": user.is_admin,
        "status_text": user.profile.status_text,
        "status_emoji": user.profile.status_emoji,
        "timezone": user.tz,
    })
}

#[async_trait]
impl Tool for ListUsersTool {
    fn name(&self) -> &'static str {
        "list_slack_users"
    }

    fn description(&self) -> &str {
        "List users in the Slack workspace"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .integer("limit", "Maximum number of users to return", 100)
            .string("cursor", "Pagination cursor for next page")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: ListUsersParams = parse_params(params)?;

        let data = self
            .slack_client
            .send(&ListUsers {
                limit: params.limit,
                cursor: params.cursor,
            })
            .await
            .into_data("Failed to list users")?;

        let members: Vec<SlackUser> = decode_field(&data, "members")?;
        let users: Vec<Value> = members
            .iter()
            .filter(|user| !user.deleted)
            .map(user_summary)
            .collect();
        let (has_more, next_cursor) = cursor_paging(&data)?;

        ToolResponse::paginated(json!({ "users": users }), has_more, next_cursor).into_response()
    }
}

#[async_trait]
impl Tool for UserInfoTool {
    fn name(&self) -> &'static str {
        "get_slack_user_info"
    }

    fn description(&self) -> &str {
        "Get detailed information about a specific Slack user"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("user", "User ID to get information about")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: UserParams = parse_params(params)?;

        let data = self
            .slack_client
            .send(&UserInfo { user: params.user })
            .await
            .into_data("Failed to get user info")?;

        let user: SlackUser = decode_field(&data, "user")?;
        let profile = &user.profile;

        ToolResponse::data(json!({
            "id": user.id,
            "name": user.name,
            "real_name": user.real_name,
            "display_name": profile.display_name,
            "email": profile.email,
            "phone": profile.phone,
            "title": profile.title,
            "is_bot": user.is_bot,
            "is_admin": user.is_admin,
            "is_owner": user.is_owner,
            "timezone": user.tz,
            "status_text": profile.status_text,
            "status_emoji": profile.status_emoji,
        }))
        .into_response()
    }
}

#[async_trait]
impl Tool for UserProfileTool {
    fn name(&self) -> &'static str {
        "get_slack_user_profile"
    }

    fn description(&self) -> &str {
        "Get user's profile information"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("user", "User ID to get profile for")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: UserParams = parse_params(params)?;

        let data = self
            .slack_client
            .send(&UserProfile { user: params.user })
            .await
            .into_data("Failed to get user profile")?;

        let profile: SlackUserProfile = decode_field(&data, "profile")?;

        ToolResponse::data(json!({
            "display_name": profile.display_name,
            "real_name": profile.real_name,
            "email": profile.email,
            "phone": profile.phone,
            "title": profile.title,
            "status_text": profile.status_text,
            "status_emoji": profile.status_emoji,
            "image_24": profile.image_24,
            "image_32": profile.image_32,
            "image_48": profile.image_48,
            "image_72": profile.image_72,
            "image_192": profile.image_192,
        }))
        .into_response()
    }
}

#[async_trait]
impl Tool for SetPresenceTool {
    fn name(&self) -> &'static str {
        "set_slack_presence"
    }

    fn description(&self) -> &str {
        "Set bot's presence status"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .enumeration("presence", "Presence status", &["auto", "away"])
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: PresenceParams = parse_params(params)?;

        self.slack_client
            .send(&SetPresence {
                presence: params.presence,
            })
            .await
            .into_data("Failed to set presence")?;

        acknowledge(format!("Presence set to {}", params.presence.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::McpError;
    use crate::slack::client::test_support::sent_forms;
    use crate::tools::test_support::{mount_slack, request_count, shared_client};
    use pretty_assertions::assert_eq;
    use wiremock::MockServer;

    #[tokio::test]
    async fn test_list_users_skips_deleted() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "users.list",
            json!({
                "ok": true,
                "members": [
                    {"id": "U1", "name": "ada", "real_name": "Ada Lovelace", "tz": "Europe/London",
                     "profile": {"display_name": "ada", "email": "ada@example.com", "status_emoji": ":wave:"}},
                    {"id": "U2", "name": "gone", "deleted": true}
                ],
                "response_metadata": {"next_cursor": ""}
            }),
        )
        .await;

        let result = ListUsersTool::new(shared_client(&server))
            .execute(json!({"limit": 50}))
            .await
            .unwrap();

        assert_eq!(
            result["users"],
            json!([{
                "id": "U1",
                "name": "ada",
                "real_name": "Ada Lovelace",
                "display_name": "ada",
                "email": "ada@example.com",
                "is_bot": false,
                "is_admin": false,
                "status_text": "",
                "status_emoji": ":wave:",
                "timezone": "Europe/London"
            }])
        );
        assert_eq!(result["has_more"], false);
        assert!(result.get("next_cursor").is_none());
        assert_eq!(sent_forms(&server, "/users.list").await[0]["limit"], "50");
    }

    #[tokio::test]
    async fn test_list_users_tolerates_null_fields() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "users.list",
            json!({
                "ok": true,
                "members": [
                    {"id": "U1", "name": "ada", "tz": "Europe/London"},
                    {"id": "U3", "name": "grace", "tz": null, "real_name": null, "deleted": null,
                     "profile": {"email": null, "status_text": null}}
                ]
            }),
        )
        .await;

        let result = ListUsersTool::new(shared_client(&server))
            .execute(json!({}))
            .await
            .unwrap();

        let grace = &result["users"][1];
        assert_eq!(grace["id"], "U3");
        assert_eq!(grace["timezone"], "");
        assert_eq!(grace["real_name"], "");
        assert_eq!(grace["email"], "");
        assert_eq!(grace["status_text"], "");
    }

    #[tokio::test]
    async fn test_user_info() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "users.info",
            json!({
                "ok": true,
                "user": {"id": "U1", "name": "ada", "is_owner": true,
                         "profile": {"title": "Analyst", "phone": "555"}}
            }),
        )
        .await;

        let result = UserInfoTool::new(shared_client(&server))
            .execute(json!({"user": "U1"}))
            .await
            .unwrap();

        assert_eq!(result["is_owner"], true);
        assert_eq!(result["title"], "Analyst");
        assert_eq!(result["phone"], "555");
        assert_eq!(result["email"], "");
    }

    #[tokio::test]
    async fn test_user_profile_images() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "users.profile.get",
            json!({"ok": true, "profile": {"image_72": "https://example.com/72.png"}}),
        )
        .await;

        let result = UserProfileTool::new(shared_client(&server))
            .execute(json!({"user": "U1"}))
            .await
            .unwrap();

        assert_eq!(result["image_72"], "https://example.com/72.png");
        assert_eq!(result["image_24"], "");
    }

    #[tokio::test]
    async fn test_set_presence() {
        let server = MockServer::start().await;
        mount_slack(&server, "users.setPresence", json!({"ok": true})).await;

        let result = SetPresenceTool::new(shared_client(&server))
            .execute(json!({"presence": "away"}))
            .await
            .unwrap();

        assert_eq!(result["message"], "Presence set to away");
        assert_eq!(sent_forms(&server, "/users.setPresence").await[0]["presence"], "away");
    }

    #[tokio::test]
    async fn test_set_presence_rejects_unknown_value() {
        let server = MockServer::start().await;

        let err = SetPresenceTool::new(shared_client(&server))
            .execute(json!({"presence": "busy"}))
            .await
            .unwrap_err();

        assert!(matches!(err, McpError::InvalidParameter(_)));
        assert_eq!(request_count(&server).await, 0);
    }
}
