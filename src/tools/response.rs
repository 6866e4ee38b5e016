use crate::error::McpResult;
use serde_json::Value;

/// Flat result object returned by every tool
#[derive(Debug)]
pub struct ToolResponse {
    /// The reshaped Slack payload
    pub data: Value,

    /// Paging info, merged into `data` on output
    pub metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Default)]
pub struct ResponseMetadata {
    /// Indicates if there's more data available (for pagination)
    pub has_more: Option<bool>,

    /// Cursor for pagination
    pub next_cursor: Option<String>,

    /// Total count reported by page-numbered methods
    pub total_count: Option<u64>,
}

impl ToolResponse {
    /// Create a simple response with just data
    pub fn data(data: Value) -> Self {
        Self {
            data,
            metadata: None,
        }
    }

    /// Create a response with cursor pagination info
    pub fn paginated(data: Value, has_more: bool, next_cursor: Option<String>) -> Self {
        Self {
            data,
            metadata: Some(ResponseMetadata {
                has_more: Some(has_more),
                next_cursor,
                total_count: None,
            }),
        }
    }

    /// Attach a total count when the method reports one
    pub fn with_total_count(mut self, total_count: Option<u64>) -> Self {
        if total_count.is_some() {
            self.metadata.get_or_insert_with(Default::default).total_count = total_count;
        }
        self
    }

    /// Convert to JSON Value for MCP protocol
    pub fn into_json(self) -> Value {
        let Some(metadata) = self.metadata else {
            return self.data;
        };
        let mut result = self.data;

        if let Some(has_more) = metadata.has_more {
            result["has_more"] = has_more.into();
        }
        if let Some(cursor) = metadata.next_cursor {
            result["next_cursor"] = cursor.into();
        }
        if let Some(count) = metadata.total_count {
            result["total_count"] = count.into();
        }

        result
    }
}

/// Helper trait for converting tool results to responses
pub trait IntoToolResponse {
    fn into_response(self) -> McpResult<Value>;
}

impl IntoToolResponse for ToolResponse {
    fn into_response(self) -> McpResult<Value> {
        Ok(self.into_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_data_only_has_no_paging_keys() {
        let result = ToolResponse::data(json!({"success": true, "message": "ok"})).into_json();

        assert_eq!(result, json!({"success": true, "message": "ok"}));
    }

    #[test]
    fn test_paginated_with_cursor() {
        let result = ToolResponse::paginated(
            json!({"channels": [{"id": "C1"}]}),
            true,
            Some("dGVhbTpDMDY=".to_string()),
        )
        .into_json();

        assert_eq!(result["channels"][0]["id"], "C1");
        assert_eq!(result["has_more"], true);
        assert_eq!(result["next_cursor"], "dGVhbTpDMDY=");
    }

    #[test]
    fn test_paginated_without_cursor() {
        let result = ToolResponse::paginated(json!({"users": []}), false, None).into_json();

        assert_eq!(result["has_more"], false);
        assert!(result.get("next_cursor").is_none());
    }

    #[test]
    fn test_total_count_only_when_reported() {
        let with = ToolResponse::data(json!({"files": []}))
            .with_total_count(Some(42))
            .into_response()
            .unwrap();
        assert_eq!(with, json!({"files": [], "total_count": 42}));

        let without = ToolResponse::data(json!({"files": []}))
            .with_total_count(None)
            .into_json();
        assert!(without.get("total_count").is_none());
        assert!(without.get("has_more").is_none());
    }
}
