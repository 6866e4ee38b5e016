use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use crate::error::McpError;
use crate::slack::SlackClient;

use super::handlers::RequestHandler;
use super::types::*;

pub struct McpServer {
    handler: Arc<RequestHandler>,
    initialized: Arc<RwLock<bool>>,
}

impl McpServer {
    pub fn new(slack_client: Arc<SlackClient>) -> Self {
        Self {
            handler: Arc::new(RequestHandler::new(slack_client)),
            initialized: Arc::new(RwLock::new(false)),
        }
    }

    /// Serve MCP over stdin/stdout until stdin closes
    pub async fn run(&self) -> Result<()> {
        let reader = BufReader::new(tokio::io::stdin());
        self.serve(reader, tokio::io::stdout()).await
    }

    /// Newline-delimited JSON-RPC loop over an arbitrary reader and writer
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buffer = String::new();

        loop {
            buffer.clear();

            match reader.read_line(&mut buffer).await {
                Ok(0) => {
                    debug!("Input closed, shutting down");
                    break;
                }
                Ok(_) => {
                    let trimmed = buffer.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let response = match self.process_request(trimmed).await {
                        Ok(Some(response)) => response,
                        // Notification, no response needed
                        Ok(None) => continue,
                        Err(e) => {
                            error!("Error processing request: {}", e);
                            JsonRpcResponse::error(None, JsonRpcError::internal_error(e.to_string()))
                        }
                    };

                    let response_str = serde_json::to_string(&response)?;
                    writer.write_all(response_str.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                    writer.flush().await?;
                }
                Err(e) => {
                    error!("Error reading input: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    async fn process_request(&self, input: &str) -> Result<Option<JsonRpcResponse>> {
        let request: JsonRpcRequest = match serde_json::from_str(input) {
            Ok(req) => req,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                return Ok(Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(),
                )));
            }
        };

        if request.jsonrpc != "2.0" {
            return Ok(Some(JsonRpcResponse::error(
                request.id.clone(),
                JsonRpcError::invalid_request(),
            )));
        }

        match request.method.as_str() {
            "initialize" => self.handle_initialize(request).await.map(Some),
            "initialized" | "notifications/initialized" => self.handle_initialized(request).await,
            "tools/list" => self.handle_list_tools(request).await.map(Some),
            "tools/call" => self.handle_call_tool(request).await.map(Some),
            "prompts/list" => Ok(Some(JsonRpcResponse::success(
                request.id,
                serde_json::json!({ "prompts": [] }),
            ))),
            "resources/list" => Ok(Some(JsonRpcResponse::success(
                request.id,
                serde_json::json!({ "resources": [] }),
            ))),
            _ => {
                warn!("Unknown method: {}", request.method);
                Ok(Some(JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::method_not_found(&request.method),
                )))
            }
        }
    }

    async fn handle_initialize(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse> {
        let params: InitializeRequest = match request.params {
            Some(p) => serde_json::from_value(p)?,
            None => {
                return Ok(JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing params".to_string()),
                ));
            }
        };

        if let Some(client) = &params.client_info {
            debug!("Initializing for {} {}", client.name, client.version);
        }

        let protocol_version = if params.protocol_version.starts_with("2025") {
            PROTOCOL_VERSION_2025.to_string()
        } else {
            PROTOCOL_VERSION.to_string()
        };

        let result = InitializeResult {
            protocol_version,
            capabilities: ServerCapabilities {
                tools: HashMap::new(),
                experimental: Default::default(),
            },
            server_info: ServerInfo {
                name: "Slack Bot MCP Server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(
            request.id,
            serde_json::to_value(result)?,
        ))
    }

    async fn handle_initialized(&self, request: JsonRpcRequest) -> Result<Option<JsonRpcResponse>> {
        *self.initialized.write().await = true;

        if request.id.is_none() {
            Ok(None)
        } else {
            Ok(Some(JsonRpcResponse::success(request.id, Value::Null)))
        }
    }

    async fn not_initialized(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        if *self.initialized.read().await {
            return None;
        }
        Some(JsonRpcResponse::error(
            request.id.clone(),
            JsonRpcError::internal_error("Server not initialized".to_string()),
        ))
    }

    async fn handle_list_tools(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse> {
        if let Some(rejection) = self.not_initialized(&request).await {
            return Ok(rejection);
        }

        let result = ListToolsResult {
            tools: self.handler.list_tools(),
        };

        Ok(JsonRpcResponse::success(
            request.id,
            serde_json::to_value(result)?,
        ))
    }

    async fn handle_call_tool(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse> {
        if let Some(rejection) = self.not_initialized(&request).await {
            return Ok(rejection);
        }

        let params: CallToolRequest = match request.params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return Ok(JsonRpcResponse::error(
                        request.id,
                        JsonRpcError::invalid_params(format!("Invalid parameters: {}", e)),
                    ));
                }
            },
            None => {
                return Ok(JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing params".to_string()),
                ));
            }
        };

        match self.handler.call_tool(&params.name, params.arguments).await {
            Ok(result) => Ok(JsonRpcResponse::success(
                request.id,
                serde_json::to_value(result)?,
            )),
            Err(e) => {
                error!("Tool {} failed: {}", params.name, e);
                Ok(JsonRpcResponse::error(request.id, tool_error(e)))
            }
        }
    }
}

fn tool_error(err: McpError) -> JsonRpcError {
    match err {
        McpError::InvalidParameter(message) => JsonRpcError::invalid_params(message),
        McpError::NotFound(message) => JsonRpcError::internal_error(message),
        other => JsonRpcError::internal_error(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slack::client::test_support::client_for;
    use crate::tools::test_support::mount_slack;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::MockServer;

    const INITIALIZE: &str = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"1.0"}}}"#;
    const INITIALIZED: &str = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;

    async fn exchange(server: &MockServer, lines: &[&str]) -> Vec<Value> {
        let mcp = McpServer::new(Arc::new(client_for(server)));
        let input = lines.join("\n") + "\n";
        let mut output = Vec::new();

        mcp.serve(input.as_bytes(), &mut output).await.unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_initialize_handshake() {
        let server = MockServer::start().await;

        let responses = exchange(&server, &[INITIALIZE, INITIALIZED]).await;

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(responses[0]["result"]["serverInfo"]["name"], "Slack Bot MCP Server");
    }

    #[tokio::test]
    async fn test_newer_protocol_version_is_echoed() {
        let server = MockServer::start().await;
        let request = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-06-18"}}"#;

        let responses = exchange(&server, &[request]).await;

        assert_eq!(responses[0]["result"]["protocolVersion"], "2025-06-18");
    }

    #[tokio::test]
    async fn test_tools_require_initialization() {
        let server = MockServer::start().await;
        let list = r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#;

        let responses = exchange(&server, &[list]).await;

        assert_eq!(responses[0]["error"]["code"], -32603);
        assert_eq!(responses[0]["error"]["message"], "Server not initialized");
    }

    #[tokio::test]
    async fn test_list_tools_after_handshake() {
        let server = MockServer::start().await;
        let list = r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#;

        let responses = exchange(&server, &[INITIALIZE, INITIALIZED, list]).await;

        let tools = responses[1]["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 44);
        assert!(tools[0]["inputSchema"]["type"] == "object");
    }

    #[tokio::test]
    async fn test_call_tool_returns_pretty_json_text() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "chat.postMessage",
            json!({"ok": true, "channel": "C1", "ts": "1700000000.000100"}),
        )
        .await;
        let call = r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"send_slack_message","arguments":{"channel":"C1","text":"hi"}}}"#;

        let responses = exchange(&server, &[INITIALIZE, INITIALIZED, call]).await;

        let content = &responses[1]["result"]["content"][0];
        assert_eq!(content["type"], "text");
        let payload: Value = serde_json::from_str(content["text"].as_str().unwrap()).unwrap();
        assert_eq!(payload["timestamp"], "1700000000.000100");
    }

    #[tokio::test]
    async fn test_call_tool_error_mapping() {
        let server = MockServer::start().await;
        mount_slack(
            &server,
            "conversations.list",
            json!({"ok": false, "error": "ratelimited"}),
        )
        .await;
        let unknown = r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"nope","arguments":{}}}"#;
        let bad_params = r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"send_slack_message","arguments":{"text":"hi"}}}"#;
        let remote = r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"list_slack_channels","arguments":{}}}"#;

        let responses =
            exchange(&server, &[INITIALIZE, INITIALIZED, unknown, bad_params, remote]).await;

        assert_eq!(responses[1]["error"]["message"], "Tool not found: nope");
        assert_eq!(responses[2]["error"]["code"], -32602);
        assert!(
            responses[2]["error"]["message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid parameters:")
        );
        assert_eq!(responses[3]["error"]["code"], -32603);
        assert_eq!(responses[3]["error"]["message"], "Failed to list channels: ratelimited");
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let server = MockServer::start().await;
        let garbage = "not json";
        let old_version = r#"{"jsonrpc":"1.0","id":1,"method":"tools/list"}"#;
        let unknown = r#"{"jsonrpc":"2.0","id":2,"method":"sampling/createMessage"}"#;
        let prompts = r#"{"jsonrpc":"2.0","id":3,"method":"prompts/list"}"#;

        let responses = exchange(&server, &[garbage, "", old_version, unknown, prompts]).await;

        assert_eq!(responses.len(), 4);
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert_eq!(responses[1]["error"]["code"], -32600);
        assert_eq!(responses[2]["error"]["code"], -32601);
        assert_eq!(responses[3]["result"], json!({"prompts": []}));
    }
}
