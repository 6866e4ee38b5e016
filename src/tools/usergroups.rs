use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::schema::SchemaBuilder;
use super::{IntoToolResponse, Tool, ToolResponse, acknowledge, decode_field};
use crate::error::McpResult;
use crate::mcp::types::ToolInputSchema;
use crate::slack::requests::{CreateUsergroup, DisableUsergroup, ListUsergroups, UpdateUsergroup};
use crate::slack::types::null_as_default;
use crate::utils::{non_empty, parse_params};

slack_tools!(
    CreateUsergroupTool,
    ListUsergroupsTool,
    UpdateUsergroupTool,
    DisableUsergroupTool,
);

#[derive(Debug, Deserialize)]
struct CreateUsergroupParams {
    name: String,
    handle: Option<String>,
    description: Option<String>,
    channels: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ListUsergroupsParams {
    #[serde(default)]
    include_disabled: bool,
}

#[derive(Debug, Deserialize)]
struct UpdateUsergroupParams {
    usergroup: String,
    name: Option<String>,
    handle: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DisableUsergroupParams {
    usergroup: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SlackUsergroup {
    id: Option<String>,
    name: Option<String>,
    handle: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    description: String,
    #[serde(deserialize_with = "null_as_default")]
    is_external: bool,
    #[serde(deserialize_with = "null_as_default")]
    user_count: u64,
    date_create: Option<i64>,
    date_update: Option<i64>,
}

impl SlackUsergroup {
    fn mutation_result(self, message: &str) -> Value {
        json!({
            "success": true,
            "usergroup_id": self.id,
            "name": self.name,
            "handle": self.handle,
            "message": message,
        })
    }
}

#[async_trait]
impl Tool for CreateUsergroupTool {
    fn name(&self) -> &'static str {
        "create_slack_usergroup"
    }

    fn description(&self) -> &str {
        "Create a new user group"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("name", "Name of the user group")
            .string("handle", "Mention handle for the group (without @)")
            .string("description", "Description of the group")
            .string_list("channels", "Default channel IDs for the group")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: CreateUsergroupParams = parse_params(params)?;

        let request = CreateUsergroup {
            name: params.name,
            handle: params.handle,
            description: params.description,
            channels: non_empty(params.channels),
        };

        let data = self
            .slack_client
            .send(&request)
            .await
            .into_data("Failed to create usergroup")?;

        let usergroup: SlackUsergroup = decode_field(&data, "usergroup")?;
        ToolResponse::data(usergroup.mutation_result("Usergroup created successfully"))
            .into_response()
    }
}

#[async_trait]
impl Tool for ListUsergroupsTool {
    fn name(&self) -> &'static str {
        "list_slack_usergroups"
    }

    fn description(&self) -> &str {
        "List user groups in the workspace"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .boolean("include_disabled", "Include disabled user groups", false)
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: ListUsergroupsParams = parse_params(params)?;

        let data = self
            .slack_client
            .send(&ListUsergroups {
                include_disabled: params.include_disabled,
            })
            .await
            .into_data("Failed to list usergroups")?;

        let usergroups: Vec<SlackUsergroup> = decode_field(&data, "usergroups")?;
        let usergroups: Vec<Value> = usergroups
            .into_iter()
            .map(|ug| {
                json!({
                    "id": ug.id,
                    "name": ug.name,
                    "handle": ug.handle,
                    "description": ug.description,
                    "is_external": ug.is_external,
                    "user_count": ug.user_count,
                    "date_create": ug.date_create,
                    "date_update": ug.date_update,
                })
            })
            .collect();

        ToolResponse::data(json!({ "usergroups": usergroups })).into_response()
    }
}

#[async_trait]
impl Tool for UpdateUsergroupTool {
    fn name(&self) -> &'static str {
        "update_slack_usergroup"
    }

    fn description(&self) -> &str {
        "Update a user group"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("usergroup", "ID of the user group to update")
            .string("name", "New name")
            .string("handle", "New mention handle")
            .string("description", "New description")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: UpdateUsergroupParams = parse_params(params)?;

        let request = UpdateUsergroup {
            usergroup: params.usergroup,
            name: params.name,
            handle: params.handle,
            description: params.description,
        };

        let data = self
            .slack_client
            .send(&request)
            .await
            .into_data("Failed to update usergroup")?;

        let usergroup: SlackUsergroup = decode_field(&data, "usergroup")?;
        ToolResponse::data(usergroup.mutation_result("Usergroup updated successfully"))
            .into_response()
    }
}

#[async_trait]
impl Tool for DisableUsergroupTool {
    fn name(&self) -> &'static str {
        "disable_slack_usergroup"
    }

    fn description(&self) -> &str {
        "Disable a user group"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("usergroup", "ID of the user group to disable")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: DisableUsergroupParams = parse_params(params)?;

        self.slack_client
            .send(&DisableUsergroup {
                usergroup: params.usergroup,
            })
            .await
            .into_data("Failed to disable usergroup")?;

        acknowledge("Usergroup disabled successfully")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slack::client::test_support::sent_forms;
    use crate::tools::test_support::{mount_slack, shared_client};
    use pretty_assertions::assert_eq;
    use wiremock::MockServer;

    #[tokio::test]
    async fn test_create_usergroup_joins_channels() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "usergroups.create",
            json!({"ok": true, "usergroup": {"id": "S1", "name": "Oncall", "handle": "oncall"}}),
        )
        .await;

        let result = CreateUsergroupTool::new(shared_client(&server))
            .execute(json!({"name": "Oncall", "handle": "oncall", "channels": ["C1", "C2"]}))
            .await
            .unwrap();

        assert_eq!(
            result,
            json!({
                "success": true,
                "usergroup_id": "S1",
                "name": "Oncall",
                "handle": "oncall",
                "message": "Usergroup created successfully"
            })
        );

        let form = &sent_forms(&server, "/usergroups.create").await[0];
        assert_eq!(form["channels"], "C1,C2");
        assert!(!form.contains_key("description"));
    }

    #[tokio::test]
    async fn test_list_usergroups_defaults() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "usergroups.list",
            json!({"ok": true, "usergroups": [{"id": "S1", "name": "Oncall", "handle": "oncall",
                                               "user_count": 4, "date_create": 1600000000}]}),
        )
        .await;

        let result = ListUsergroupsTool::new(shared_client(&server))
            .execute(Value::Null)
            .await
            .unwrap();

        assert_eq!(result["usergroups"][0]["user_count"], 4);
        assert_eq!(result["usergroups"][0]["description"], "");
        assert_eq!(result["usergroups"][0]["is_external"], false);
        assert_eq!(
            sent_forms(&server, "/usergroups.list").await[0]["include_disabled"],
            "false"
        );
    }

    #[tokio::test]
    async fn test_list_usergroups_tolerates_null_fields() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "usergroups.list",
            json!({"ok": true, "usergroups": [{"id": "S2", "name": "Design", "description": null,
                                               "is_external": null, "user_count": null}]}),
        )
        .await;

        let result = ListUsergroupsTool::new(shared_client(&server))
            .execute(json!({}))
            .await
            .unwrap();

        assert_eq!(result["usergroups"][0]["description"], "");
        assert_eq!(result["usergroups"][0]["is_external"], false);
        assert_eq!(result["usergroups"][0]["user_count"], 0);
    }

    #[tokio::test]
    async fn test_update_and_disable() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "usergroups.update",
            json!({"ok": true, "usergroup": {"id": "S1", "name": "Oncall EU", "handle": "oncall-eu"}}),
        )
        .await;
        mount_slack(&server, "usergroups.disable", json!({"ok": true})).await;
        let client = shared_client(&server);

        let updated = UpdateUsergroupTool::new(client.clone())
            .execute(json!({"usergroup": "S1", "name": "Oncall EU", "handle": "oncall-eu"}))
            .await
            .unwrap();
        let disabled = DisableUsergroupTool::new(client)
            .execute(json!({"usergroup": "S1"}))
            .await
            .unwrap();

        assert_eq!(updated["handle"], "oncall-eu");
        assert_eq!(updated["message"], "Usergroup updated successfully");
        assert_eq!(disabled["message"], "Usergroup disabled successfully");
    }
}
