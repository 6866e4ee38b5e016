use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::schema::SchemaBuilder;
use super::{IntoToolResponse, Tool, ToolResponse, acknowledge, decode_field};
use crate::error::McpResult;
use crate::mcp::types::ToolInputSchema;
use crate::slack::requests::{AddBookmark, ListBookmarks, RemoveBookmark};
use crate::slack::types::null_as_default;
use crate::utils::parse_params;

slack_tools!(AddBookmarkTool, RemoveBookmarkTool, ListBookmarksTool);

#[derive(Debug, Deserialize)]
struct AddBookmarkParams {
    channel_id: String,
    title: String,
    #[serde(rename = "type")]
    kind: String,
    link: Option<String>,
    emoji: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RemoveBookmarkParams {
    channel_id: String,
    bookmark_id: String,
}

#[derive(Debug, Deserialize)]
struct ListBookmarksParams {
    channel_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SlackBookmark {
    id: Option<String>,
    title: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    link: String,
    #[serde(deserialize_with = "null_as_default")]
    emoji: String,
    created_by: Option<String>,
    date_created: Option<i64>,
}

#[async_trait]
impl Tool for AddBookmarkTool {
    fn name(&self) -> &'static str {
        "add_slack_bookmark"
    }

    fn description(&self) -> &str {
        "Add a bookmark to a Slack channel"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("channel_id", "Channel ID to add the bookmark to")
            .required_string("title", "Title of the bookmark")
            .required_string("type", "Bookmark type (currently only 'link')")
            .string("link", "URL the bookmark points to")
            .string("emoji", "Emoji tag for the bookmark")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: AddBookmarkParams = parse_params(params)?;

        let request = AddBookmark {
            channel_id: params.channel_id,
            title: params.title,
            kind: params.kind,
            link: params.link,
            emoji: params.emoji,
        };

        let data = self
            .slack_client
            .send(&request)
            .await
            .into_data("Failed to add bookmark")?;

        let bookmark: SlackBookmark = decode_field(&data, "bookmark")?;
        ToolResponse::data(json!({
            "success": true,
            "bookmark_id": bookmark.id,
            "title": bookmark.title,
            "message": "Bookmark added successfully",
        }))
        .into_response()
    }
}

#[async_trait]
impl Tool for RemoveBookmarkTool {
    fn name(&self) -> &'static str {
        "remove_slack_bookmark"
    }

    fn description(&self) -> &str {
        "Remove a bookmark from a Slack channel"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("channel_id", "Channel ID the bookmark belongs to")
            .required_string("bookmark_id", "ID of the bookmark to remove")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: RemoveBookmarkParams = parse_params(params)?;

        self.slack_client
            .send(&RemoveBookmark {
                channel_id: params.channel_id,
                bookmark_id: params.bookmark_id,
            })
            .await
            .into_data("Failed to remove bookmark")?;

        acknowledge("Bookmark removed successfully")
    }
}

#[async_trait]
impl Tool for ListBookmarksTool {
    fn name(&self) -> &'static str {
        "list_slack_bookmarks"
    }

    fn description(&self) -> &str {
        "List bookmarks in a Slack channel"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("channel_id", "Channel ID to list bookmarks from")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: ListBookmarksParams = parse_params(params)?;

        let data = self
            .slack_client
            .send(&ListBookmarks {
                channel_id: params.channel_id,
            })
            .await
            .into_data("Failed to list bookmarks")?;

        let bookmarks: Vec<SlackBookmark> = decode_field(&data, "bookmarks")?;
        let bookmarks: Vec<Value> = bookmarks
            .into_iter()
            .map(|bookmark| {
                json!({
                    "id": bookmark.id,
                    "title": bookmark.title,
                    "type": bookmark.kind,
                    "link": bookmark.link,
                    "emoji": bookmark.emoji,
                    "created_by": bookmark.created_by,
                    "date_created": bookmark.date_created,
                })
            })
            .collect();

        ToolResponse::data(json!({ "bookmarks": bookmarks })).into_response()
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
    async fn test_add_bookmark_sends_type_field() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "bookmarks.add",
            json!({"ok": true, "bookmark": {"id": "Bk1", "title": "Runbook", "type": "link"}}),
        )
        .await;

        let result = AddBookmarkTool::new(shared_client(&server))
            .execute(json!({
                "channel_id": "C1",
                "title": "Runbook",
                "type": "link",
                "link": "https://example.com/runbook"
            }))
            .await
            .unwrap();

        assert_eq!(
            result,
            json!({
                "success": true,
                "bookmark_id": "Bk1",
                "title": "Runbook",
                "message": "Bookmark added successfully"
            })
        );

        let form = &sent_forms(&server, "/bookmarks.add").await[0];
        assert_eq!(form["type"], "link");
        assert_eq!(form["link"], "https://example.com/runbook");
        assert!(!form.contains_key("emoji"));
        assert!(!form.contains_key("kind"));
    }

    #[tokio::test]
    async fn test_list_bookmarks() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "bookmarks.list",
            json!({
                "ok": true,
                "bookmarks": [{"id": "Bk1", "title": "Runbook", "type": "link",
                               "link": "https://example.com", "created_by": "U1", "date_created": 1700000000}]
            }),
        )
        .await;

        let result = ListBookmarksTool::new(shared_client(&server))
            .execute(json!({"channel_id": "C1"}))
            .await
            .unwrap();

        assert_eq!(
            result["bookmarks"][0],
            json!({
                "id": "Bk1",
                "title": "Runbook",
                "type": "link",
                "link": "https://example.com",
                "emoji": "",
                "created_by": "U1",
                "date_created": 1700000000
            })
        );
    }

    #[tokio::test]
    async fn test_list_bookmarks_tolerates_null_fields() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "bookmarks.list",
            json!({
                "ok": true,
                "bookmarks": [{"id": "Bk2", "title": "Dashboard", "type": "link",
                               "link": null, "emoji": null, "date_created": null}]
            }),
        )
        .await;

        let result = ListBookmarksTool::new(shared_client(&server))
            .execute(json!({"channel_id": "C1"}))
            .await
            .unwrap();

        assert_eq!(result["bookmarks"][0]["emoji"], "");
        assert_eq!(result["bookmarks"][0]["link"], "");
        assert_eq!(result["bookmarks"][0]["date_created"], Value::Null);
    }

    #[tokio::test]
    async fn test_remove_bookmark() {
        let server = MockServer::start().await;
        mount_slack(&server, "bookmarks.remove", json!({"ok": true})).await;

        RemoveBookmarkTool::new(shared_client(&server))
            .execute(json!({"channel_id": "C1", "bookmark_id": "Bk1"}))
            .await
            .unwrap();

        let form = &sent_forms(&server, "/bookmarks.remove").await[0];
        assert_eq!(form["bookmark_id"], "Bk1");
        assert_eq!(form["channel_id"], "C1");
    }
}
