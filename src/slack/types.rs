//! Slack objects the tool layer reshapes. Every field is defaulted so a
//! sparse payload still decodes, and an explicit `null` reads as the default.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Treat `null` like a missing key
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackUserProfile {
    #[serde(deserialize_with = "null_as_default")]
    pub real_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status_emoji: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_24: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_32: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_48: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_72: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_192: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackUser {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub real_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_bot: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_admin: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_owner: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub deleted: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub tz: String,
    #[serde(deserialize_with = "null_as_default")]
    pub profile: SlackUserProfile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackChannel {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_private: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_member: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_archived: bool,
    pub created: Option<i64>,
    pub creator: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub num_members: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub topic: ChannelText,
    #[serde(deserialize_with = "null_as_default")]
    pub purpose: ChannelText,
}

/// Topic or purpose; only the text is surfaced
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelText {
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackMessage {
    #[serde(deserialize_with = "null_as_default")]
    pub ts: String,
    pub user: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(rename = "type")]
    pub message_type: Option<String>,
    pub thread_ts: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub reply_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub reactions: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub attachments: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub blocks: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackFile {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    pub name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub size: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub filetype: String,
    #[serde(deserialize_with = "null_as_default")]
    pub mimetype: String,
    pub user: Option<String>,
    pub created: Option<i64>,
    pub url_private: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub permalink: String,
    #[serde(deserialize_with = "null_as_default")]
    pub channels: Vec<String>,
}

/// `response_metadata` block of cursor-paginated methods
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseMetadata {
    #[serde(deserialize_with = "null_as_default")]
    pub next_cursor: String,
}

impl ResponseMetadata {
    pub fn cursor(&self) -> Option<String> {
        let cursor = self.next_cursor.trim();
        (!cursor.is_empty()).then(|| cursor.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sparse_channel_decodes_with_defaults() {
        let channel: SlackChannel =
            serde_json::from_value(json!({"id": "C1", "name": "general"})).unwrap();

        assert_eq!(channel.id, "C1");
        assert!(!channel.is_private);
        assert_eq!(channel.num_members, 0);
        assert_eq!(channel.topic.value, "");
        assert!(channel.created.is_none());
    }

    #[test]
    fn test_user_profile_fields() {
        let user: SlackUser = serde_json::from_value(json!({
            "id": "U1",
            "name": "ada",
            "tz": "Europe/London",
            "profile": {"display_name": "Ada", "email": "ada@example.com"}
        }))
        .unwrap();

        assert_eq!(user.profile.display_name, "Ada");
        assert_eq!(user.profile.status_emoji, "");
        assert_eq!(user.tz, "Europe/London");
        assert!(!user.deleted);
    }

    #[test]
    fn test_explicit_nulls_read_as_defaults() {
        let user: SlackUser = serde_json::from_value(json!({
            "id": "U2",
            "tz": null,
            "is_bot": null,
            "profile": {"email": null, "image_72": null}
        }))
        .unwrap();
        assert_eq!(user.tz, "");
        assert!(!user.is_bot);
        assert_eq!(user.profile.email, "");

        let channel: SlackChannel = serde_json::from_value(json!({
            "id": "C1",
            "topic": null,
            "purpose": {"value": null},
            "num_members": null
        }))
        .unwrap();
        assert_eq!(channel.topic.value, "");
        assert_eq!(channel.purpose.value, "");
        assert_eq!(channel.num_members, 0);

        let message: SlackMessage =
            serde_json::from_value(json!({"ts": "1.0", "text": null, "reactions": null})).unwrap();
        assert_eq!(message.text, "");
        assert!(message.reactions.is_empty());

        let file: SlackFile =
            serde_json::from_value(json!({"id": "F1", "title": null, "channels": null})).unwrap();
        assert_eq!(file.title, "");
        assert!(file.channels.is_empty());
    }

    #[test]
    fn test_message_type_is_renamed() {
        let message: SlackMessage =
            serde_json::from_value(json!({"ts": "1.0", "type": "message", "text": "hi"})).unwrap();

        assert_eq!(message.message_type.as_deref(), Some("message"));
        assert!(message.blocks.is_empty());
    }

    #[test]
    fn test_blank_cursor_is_none() {
        let meta: ResponseMetadata = serde_json::from_value(json!({"next_cursor": ""})).unwrap();
        assert!(meta.cursor().is_none());

        let meta: ResponseMetadata =
            serde_json::from_value(json!({"next_cursor": "dXNlcjpVMDY="})).unwrap();
        assert_eq!(meta.cursor().as_deref(), Some("dXNlcjpVMDY="));
    }
}
