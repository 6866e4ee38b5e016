use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::{Map, Value};

use crate::error::{McpError, McpResult};

/// Raw decoded Slack payload
pub type SlackData = Map<String, Value>;

const UNKNOWN_ERROR: &str = "unknown_error";

/// Uniform result of one Slack call.
///
/// The transport never raises: remote application errors, HTTP failures and
/// decode failures all land in `Failure`. Callers decide what is fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum SlackResponse {
    Success {
        data: SlackData,
        warning: Option<String>,
    },
    Failure {
        data: SlackData,
        error: String,
    },
}

impl SlackResponse {
    pub fn success(data: SlackData) -> Self {
        let warning = data
            .get("warning")
            .and_then(Value::as_str)
            .map(str::to_string);
        SlackResponse::Success { data, warning }
    }

    /// Failure carrying the remote payload (Slack answered `ok: false`)
    pub fn remote_failure(data: SlackData) -> Self {
        let error = data
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Self::with_error(data, error)
    }

    /// Failure with no remote payload (network, HTTP status, decode, local IO)
    pub fn failure(error: impl Into<String>) -> Self {
        Self::with_error(SlackData::new(), error.into())
    }

    fn with_error(data: SlackData, error: String) -> Self {
        let error = if error.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            error
        };
        SlackResponse::Failure { data, error }
    }

    /// Decode a Slack JSON body: `ok: true` is success, anything else is a failure
    pub fn from_payload(payload: Value) -> Self {
        match payload {
            Value::Object(data) => {
                if data.get("ok").and_then(Value::as_bool).unwrap_or(false) {
                    Self::success(data)
                } else {
                    Self::remote_failure(data)
                }
            }
            other => Self::failure(format!("Unexpected Slack response: {}", other)),
        }
    }

    pub fn ok(&self) -> bool {
        matches!(self, SlackResponse::Success { .. })
    }

    pub fn data(&self) -> &SlackData {
        match self {
            SlackResponse::Success { data, .. } | SlackResponse::Failure { data, .. } => data,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SlackResponse::Success { .. } => None,
            SlackResponse::Failure { error, .. } => Some(error),
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            SlackResponse::Success { warning, .. } => warning.as_deref(),
            SlackResponse::Failure { .. } => None,
        }
    }

    /// Convert to the façade tier: success yields the payload, failure becomes
    /// `McpError::SlackApi("<context>: <error>")`
    pub fn into_data(self, context: &str) -> McpResult<SlackData> {
        match self {
            SlackResponse::Success { data, .. } => Ok(data),
            SlackResponse::Failure { error, .. } => {
                Err(McpError::SlackApi(format!("{}: {}", context, error)))
            }
        }
    }
}

impl Serialize for SlackResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SlackResponse", 4)?;
        state.serialize_field("ok", &self.ok())?;
        state.serialize_field("data", self.data())?;
        state.serialize_field("error", &self.error())?;
        state.serialize_field("warning", &self.warning())?;
        state.end()
    }
}
