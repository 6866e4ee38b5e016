use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::schema::SchemaBuilder;
use super::{IntoToolResponse, Tool, ToolResponse, acknowledge, decode_field};
use crate::error::McpResult;
use crate::mcp::types::ToolInputSchema;
use crate::slack::FileUpload;
use crate::slack::requests::{DeleteFile, FileInfo, ListFiles};
use crate::slack::types::SlackFile;
use crate::utils::{OneOrMany, parse_params};

slack_tools!(UploadFileTool, ListFilesTool, FileInfoTool, DeleteFileTool);

#[derive(Debug, Deserialize)]
struct UploadFileParams {
    channels: OneOrMany,
    file_source: String,
    filename: Option<String>,
    title: Option<String>,
    initial_comment: Option<String>,
    thread_ts: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListFilesParams {
    #[serde(default = "list_default_count")]
    count: u32,
    channel: Option<String>,
    user: Option<String>,
    ts_from: Option<String>,
    ts_to: Option<String>,
    types: Option<String>,
    #[serde(default = "first_page")]
    page: u32,
}

#[derive(Debug, Deserialize)]
struct FileParams {
    file_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Paging {
    total: Option<u64>,
}

fn list_default_count() -> u32 {
    20
}

fn first_page() -> u32 {
    1
}

#[async_trait]
impl Tool for UploadFileTool {
    fn name(&self) -> &'static str {
        "upload_slack_file"
    }

    fn description(&self) -> &str {
        "Upload a file to Slack (supports URLs, local paths, or text content)"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .one_or_many("channels", "Channel ID or list of channel IDs to share the file in", true)
            .required_string(
                "file_source",
                "URL to download, local file path, or literal text content",
            )
            .string("filename", "Filename (required when file_source is text content)")
            .string("title", "Title of the file")
            .string("initial_comment", "Message to post along with the file")
            .string("thread_ts", "Thread timestamp to upload the file into")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: UploadFileParams = parse_params(params)?;

        let upload = FileUpload::new(
            params.channels.into_vec(),
            &params.file_source,
            params.filename,
        )?
        .with_title(params.title)
        .with_initial_comment(params.initial_comment)
        .with_thread_ts(params.thread_ts);

        let data = self
            .slack_client
            .upload_file(upload)
            .await
            .into_data("Failed to upload file")?;

        let file: SlackFile = decode_field(&data, "file")?;
        ToolResponse::data(json!({
            "success": true,
            "file_id": file.id,
            "filename": file.name,
            "size": file.size,
            "url": file.url_private,
            "message": "File uploaded successfully",
        }))
        .into_response()
    }
}

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &'static str {
        "list_slack_files"
    }

    fn description(&self) -> &str {
        "List files in the Slack workspace"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .integer("count", "Number of files to return per page", 20)
            .string("channel", "Filter files by channel ID")
            .string("user", "Filter files by user ID")
            .string("ts_from", "Filter files created after this timestamp")
            .string("ts_to", "Filter files created before this timestamp")
            .string("types", "Filter by file types (e.g. images,pdfs)")
            .integer("page", "Page number", 1)
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: ListFilesParams = parse_params(params)?;

        let request = ListFiles {
            count: params.count,
            page: params.page,
            user: params.user,
            channel: params.channel,
            ts_from: params.ts_from,
            ts_to: params.ts_to,
            types: params.types,
        };

        let data = self
            .slack_client
            .send(&request)
            .await
            .into_data("Failed to list files")?;

        let files: Vec<SlackFile> = decode_field(&data, "files")?;
        let files: Vec<Value> = files
            .into_iter()
            .map(|file| {
                json!({
                    "id": file.id,
                    "name": file.name,
                    "title": file.title,
                    "size": file.size,
                    "type": file.filetype,
                    "user": file.user,
                    "created": file.created,
                    "url": file.url_private,
                    "mimetype": file.mimetype,
                })
            })
            .collect();
        let paging: Paging = decode_field(&data, "paging")?;

        ToolResponse::data(json!({ "files": files }))
            .with_total_count(paging.total)
            .into_response()
    }
}

#[async_trait]
impl Tool for FileInfoTool {
    fn name(&self) -> &'static str {
        "get_slack_file_info"
    }

    fn description(&self) -> &str {
        "Get information about a specific file"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("file_id", "ID of the file")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: FileParams = parse_params(params)?;

        let data = self
            .slack_client
            .send(&FileInfo {
                file: params.file_id,
            })
            .await
            .into_data("Failed to get file info")?;

        let file: SlackFile = decode_field(&data, "file")?;
        ToolResponse::data(json!({
            "id": file.id,
            "name": file.name,
            "title": file.title,
            "size": file.size,
            "type": file.filetype,
            "mimetype": file.mimetype,
            "user": file.user,
            "created": file.created,
            "url": file.url_private,
            "permalink": file.permalink,
            "channels": file.channels,
        }))
        .into_response()
    }
}

#[async_trait]
impl Tool for DeleteFileTool {
    fn name(&self) -> &'static str {
        "delete_slack_file"
    }

    fn description(&self) -> &str {
        "Delete a file from Slack"
    }

    fn input_schema(&self) -> ToolInputSchema {
        SchemaBuilder::new()
            .required_string("file_id", "ID of the file to delete")
            .build()
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: FileParams = parse_params(params)?;

        self.slack_client
            .send(&DeleteFile {
                file: params.file_id,
            })
            .await
            .into_data("Failed to delete file")?;

        acknowledge("File deleted successfully")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::McpError;
    use crate::slack::client::test_support::sent_forms;
    use crate::tools::test_support::{mount_slack, request_count, shared_client};
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_upload_text_content() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "files.getUploadURLExternal",
            json!({"ok": true, "upload_url": format!("{}/upload/F1", server.uri()), "file_id": "F1"}),
        )
        .await;
        Mock::given(method("POST"))
            .and(path("/upload/F1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        mount_slack(
            &server,
            "files.completeUploadExternal",
            json!({
                "ok": true,
                "files": [{"id": "F1", "name": "notes.md", "size": 5,
                           "url_private": "https://files.slack.com/F1/notes.md"}]
            }),
        )
        .await;

        let result = UploadFileTool::new(shared_client(&server))
            .execute(json!({
                "channels": "C1",
                "file_source": "# hi",
                "filename": "notes.md"
            }))
            .await
            .unwrap();

        assert_eq!(
            result,
            json!({
                "success": true,
                "file_id": "F1",
                "filename": "notes.md",
                "size": 5,
                "url": "https://files.slack.com/F1/notes.md",
                "message": "File uploaded successfully"
            })
        );
    }

    #[tokio::test]
    async fn test_upload_text_without_filename_makes_no_request() {
        let server = MockServer::start().await;

        let err = UploadFileTool::new(shared_client(&server))
            .execute(json!({"channels": ["C1"], "file_source": "plain words, not a file"}))
            .await
            .unwrap_err();

        assert!(matches!(err, McpError::InvalidParameter(_)));
        assert!(err.to_string().contains("filename is required when uploading text content"));
        assert_eq!(request_count(&server).await, 0);
    }

    #[tokio::test]
    async fn test_upload_failure_context() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "files.getUploadURLExternal",
            json!({"ok": false, "error": "not_allowed_token_type"}),
        )
        .await;

        let err = UploadFileTool::new(shared_client(&server))
            .execute(json!({"channels": "C1", "file_source": "x", "filename": "x.txt"}))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to upload file: not_allowed_token_type");
    }

    #[tokio::test]
    async fn test_list_files_with_total() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "files.list",
            json!({
                "ok": true,
                "files": [{"id": "F1", "name": "a.pdf", "filetype": "pdf", "mimetype": "application/pdf",
                           "size": 10, "user": "U1", "created": 1700000000}],
                "paging": {"count": 20, "total": 37, "page": 1, "pages": 2}
            }),
        )
        .await;

        let result = ListFilesTool::new(shared_client(&server))
            .execute(json!({"channel": "C1"}))
            .await
            .unwrap();

        assert_eq!(result["files"][0]["type"], "pdf");
        assert_eq!(result["files"][0]["title"], "");
        assert_eq!(result["total_count"], 37);

        let form = &sent_forms(&server, "/files.list").await[0];
        assert_eq!(form["count"], "20");
        assert_eq!(form["page"], "1");
        assert_eq!(form["channel"], "C1");
        assert!(!form.contains_key("user"));
    }

    #[tokio::test]
    async fn test_list_files_tolerates_null_fields() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "files.list",
            json!({
                "ok": true,
                "files": [{"id": "F2", "name": null, "title": null, "filetype": null,
                           "mimetype": null, "size": null, "channels": null}],
                "paging": null
            }),
        )
        .await;

        let result = ListFilesTool::new(shared_client(&server))
            .execute(json!({}))
            .await
            .unwrap();

        assert_eq!(result["files"][0]["id"], "F2");
        assert_eq!(result["files"][0]["title"], "");
        assert_eq!(result["files"][0]["type"], "");
        assert!(result.get("total_count").is_none());
    }

    #[tokio::test]
    async fn test_file_info_and_delete_send_file_param() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "files.info",
            json!({"ok": true, "file": {"id": "F1", "name": "a.pdf", "channels": ["C1"],
                                        "permalink": "https://example.slack.com/files/F1"}}),
        )
        .await;
        mount_slack(&server, "files.delete", json!({"ok": true})).await;
        let client = shared_client(&server);

        let info = FileInfoTool::new(client.clone())
            .execute(json!({"file_id": "F1"}))
            .await
            .unwrap();
        let deleted = DeleteFileTool::new(client)
            .execute(json!({"file_id": "F1"}))
            .await
            .unwrap();

        assert_eq!(info["channels"], json!(["C1"]));
        assert_eq!(info["permalink"], "https://example.slack.com/files/F1");
        assert_eq!(deleted["message"], "File deleted successfully");
        assert_eq!(sent_forms(&server, "/files.info").await[0]["file"], "F1");
        assert_eq!(sent_forms(&server, "/files.delete").await[0]["file"], "F1");
    }
}
