use async_trait::async_trait;
use serde_json::{Value, json};

use super::schema::no_params;
use super::{IntoToolResponse, Tool, ToolResponse, field};
use crate::error::McpResult;
use crate::mcp::types::ToolInputSchema;
use crate::slack::requests::AuthTest;

slack_tools!(TestAuthTool);

#[async_trait]
impl Tool for TestAuthTool {
    fn name(&self) -> &'static str {
        "test_slack_auth"
    }

    fn description(&self) -> &str {
        "Test Slack authentication and get bot information"
    }

    fn input_schema(&self) -> ToolInputSchema {
        no_params()
    }

    async fn execute(&self, _params: Value) -> McpResult<Value> {
        let data = self
            .slack_client
            .send(&AuthTest {})
            .await
            .into_data("Authentication failed")?;

        let or_unknown = |key: &str| match data.get(key) {
            Some(Value::String(value)) => json!(value),
            _ => json!("Unknown"),
        };

        ToolResponse::data(json!({
            "authenticated": true,
            "bot_user": or_unknown("user"),
            "team": or_unknown("team"),
            "user_id": field(&data, "user_id"),
            "team_id": field(&data, "team_id"),
        }))
        .into_response()
    }
}
