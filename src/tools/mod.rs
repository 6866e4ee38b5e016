/// Declares tool structs that only hold the shared Slack client
macro_rules! slack_tools {
    ($($tool:ident),+ $(,)?) => {
        $(
            pub struct $tool {
                slack_client: std::sync::Arc<crate::slack::SlackClient>,
            }

            impl $tool {
                pub fn new(slack_client: std::sync::Arc<crate::slack::SlackClient>) -> Self {
                    Self { slack_client }
                }
            }
        )+
    };
}

pub mod auth;
pub mod bookmarks;
pub mod channels;
pub mod files;
pub mod message_utils;
pub mod messages;
pub mod pins;
pub mod reactions;
pub mod response;
pub mod schema;
pub mod team;
pub mod usergroups;
pub mod users;

use crate::error::{IntoMcpError, McpResult};
use crate::mcp::types::ToolInputSchema;
use crate::slack::SlackData;
use crate::slack::types::ResponseMetadata;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

pub use response::{IntoToolResponse, ToolResponse};

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> ToolInputSchema;
    async fn execute(&self, params: Value) -> McpResult<Value>;
}

/// Decode one key of a Slack payload; a missing or null key yields the default
pub(crate) fn decode_field<T: DeserializeOwned + Default>(
    data: &SlackData,
    key: &str,
) -> McpResult<T> {
    match data.get(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => T::deserialize(value)
            .mcp_context(&format!("Unexpected '{}' in Slack response", key)),
    }
}

/// Raw value of a key, `null` when missing
pub(crate) fn field(data: &SlackData, key: &str) -> Value {
    data.get(key).cloned().unwrap_or(Value::Null)
}

/// `has_more` and `next_cursor` of a cursor-paginated method
pub(crate) fn cursor_paging(data: &SlackData) -> McpResult<(bool, Option<String>)> {
    let metadata: ResponseMetadata = decode_field(data, "response_metadata")?;
    let next_cursor = metadata.cursor();
    let has_more = data
        .get("has_more")
        .and_then(Value::as_bool)
        .unwrap_or(next_cursor.is_some());
    Ok((has_more, next_cursor))
}

/// Result of a mutation that returns nothing worth reshaping
pub(crate) fn acknowledge(message: impl Into<String>) -> McpResult<Value> {
    ToolResponse::data(json!({
        "success": true,
        "message": message.into(),
    }))
    .into_response()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::McpError;
    use crate::slack::types::SlackChannel;
    use serde_json::json;

    fn data(value: Value) -> SlackData {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_decode_field_missing_is_default() {
        let channels: Vec<SlackChannel> = decode_field(&data(json!({"ok": true})), "channels").unwrap();
        assert!(channels.is_empty());
    }

    #[test]
    fn test_decode_field_wrong_shape_is_internal_error() {
        let err = decode_field::<Vec<SlackChannel>>(&data(json!({"channels": "nope"})), "channels")
            .unwrap_err();
        assert!(matches!(err, McpError::Internal(_)));
        assert!(err.to_string().contains("Unexpected 'channels'"));
    }

    #[test]
    fn test_cursor_paging() {
        let (has_more, cursor) = cursor_paging(&data(json!({
            "response_metadata": {"next_cursor": "abc"}
        })))
        .unwrap();
        assert!(has_more);
        assert_eq!(cursor.as_deref(), Some("abc"));

        let (has_more, cursor) = cursor_paging(&data(json!({
            "has_more": false,
            "response_metadata": {"next_cursor": ""}
        })))
        .unwrap();
        assert!(!has_more);
        assert!(cursor.is_none());
    }

    #[test]
    fn test_acknowledge() {
        assert_eq!(
            acknowledge("Message deleted successfully").unwrap(),
            json!({"success": true, "message": "Message deleted successfully"})
        );
    }
}
