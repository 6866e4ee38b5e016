//! Typed request bodies, one per Slack method.
//!
//! Optional fields are skipped when absent (and, for strings and lists, when
//! empty) so the outbound form only carries what the caller supplied.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::methods::SlackMethod;

/// A request body bound to the Slack method that accepts it
pub trait SlackRequest: Serialize + Send + Sync {
    const METHOD: SlackMethod;
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

fn is_empty_list<T>(value: &Option<Vec<T>>) -> bool {
    value.as_ref().is_none_or(Vec::is_empty)
}

/// Slack takes ID lists as one comma-separated string
fn comma_joined<S: Serializer>(values: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&values.join(","))
}

fn comma_joined_opt<S: Serializer>(
    values: &Option<Vec<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match values {
        Some(values) => comma_joined(values, serializer),
        None => serializer.serialize_none(),
    }
}

macro_rules! slack_request {
    ($($request:ty => $method:ident),+ $(,)?) => {
        $(
            impl SlackRequest for $request {
                const METHOD: SlackMethod = SlackMethod::$method;
            }
        )+
    };
}

/// Bodies that only carry a channel ID
macro_rules! channel_request {
    ($($request:ident),+ $(,)?) => {
        $(
            #[derive(Debug, Serialize)]
            pub struct $request {
                pub channel: String,
            }

            impl $request {
                pub fn new(channel: impl Into<String>) -> Self {
                    Self {
                        channel: channel.into(),
                    }
                }
            }
        )+
    };
}

/// Bodies addressing one message by channel + timestamp
macro_rules! message_request {
    ($($request:ident),+ $(,)?) => {
        $(
            #[derive(Debug, Serialize)]
            pub struct $request {
                pub channel: String,
                pub timestamp: String,
            }

            impl $request {
                pub fn new(channel: impl Into<String>, timestamp: impl Into<String>) -> Self {
                    Self {
                        channel: channel.into(),
                        timestamp: timestamp.into(),
                    }
                }
            }
        )+
    };
}

// ==================== AUTH ====================

#[derive(Debug, Default, Serialize)]
pub struct AuthTest {}

// ==================== CHAT ====================

#[derive(Debug, Default, Serialize)]
pub struct PostMessage {
    pub channel: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "is_empty_list")]
    pub blocks: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "is_empty_list")]
    pub attachments: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "is_blank")]
    pub thread_ts: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub icon_emoji: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateMessage {
    pub channel: String,
    pub ts: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "is_empty_list")]
    pub blocks: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "is_empty_list")]
    pub attachments: Option<Vec<Value>>,
}

#[derive(Debug, Serialize)]
pub struct DeleteMessage {
    pub channel: String,
    pub ts: String,
}

#[derive(Debug, Default, Serialize)]
pub struct ScheduleMessage {
    pub channel: String,
    pub post_at: i64,
    #[serde(skip_serializing_if = "is_blank")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "is_empty_list")]
    pub blocks: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "is_empty_list")]
    pub attachments: Option<Vec<Value>>,
}

// ==================== CONVERSATIONS ====================

#[derive(Debug, Serialize)]
pub struct ListConversations {
    pub exclude_archived: bool,
    pub limit: u32,
    pub types: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub cursor: Option<String>,
}

channel_request! {
    ConversationInfo,
    JoinConversation,
    LeaveConversation,
    ArchiveConversation,
    UnarchiveConversation,
    ListPins,
}

#[derive(Debug, Serialize)]
pub struct CreateConversation {
    pub name: String,
    pub is_private: bool,
}

#[derive(Debug, Serialize)]
pub struct InviteToConversation {
    pub channel: String,
    #[serde(serialize_with = "comma_joined")]
    pub users: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct KickFromConversation {
    pub channel: String,
    pub user: String,
}

#[derive(Debug, Serialize)]
pub struct SetConversationTopic {
    pub channel: String,
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct SetConversationPurpose {
    pub channel: String,
    pub purpose: String,
}

#[derive(Debug, Default, Serialize)]
pub struct ConversationHistory {
    pub channel: String,
    pub limit: u32,
    #[serde(skip_serializing_if = "is_blank")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub latest: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub oldest: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct ConversationReplies {
    pub channel: String,
    pub ts: String,
    pub limit: u32,
    #[serde(skip_serializing_if = "is_blank")]
    pub cursor: Option<String>,
}

// ==================== USERS ====================

#[derive(Debug, Serialize)]
pub struct ListUsers {
    pub limit: u32,
    #[serde(skip_serializing_if = "is_blank")]
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub user: String,
}

#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub user: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Auto,
    Away,
}

impl Presence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Auto => "auto",
            Presence::Away => "away",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SetPresence {
    pub presence: Presence,
}

// ==================== FILES ====================

#[derive(Debug, Serialize)]
pub struct GetUploadUrlExternal {
    pub filename: String,
    pub length: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadedFileRef {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Default, Serialize)]
pub struct CompleteUploadExternal {
    pub files: Vec<UploadedFileRef>,
    #[serde(skip_serializing_if = "is_blank")]
    pub channel_id: Option<String>,
    #[serde(
        skip_serializing_if = "is_empty_list",
        serialize_with = "comma_joined_opt"
    )]
    pub channels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "is_blank")]
    pub initial_comment: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub thread_ts: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct ListFiles {
    pub count: u32,
    pub page: u32,
    #[serde(skip_serializing_if = "is_blank")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub ts_from: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub ts_to: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub types: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FileInfo {
    pub file: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteFile {
    pub file: String,
}

// ==================== REACTIONS & PINS ====================

message_request! {
    GetReactions,
    AddPin,
    RemovePin,
}

#[derive(Debug, Serialize)]
pub struct AddReaction {
    pub name: String,
    pub channel: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct RemoveReaction {
    pub name: String,
    pub channel: String,
    pub timestamp: String,
}

// ==================== BOOKMARKS ====================

#[derive(Debug, Default, Serialize)]
pub struct AddBookmark {
    pub channel_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub emoji: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RemoveBookmark {
    pub channel_id: String,
    pub bookmark_id: String,
}

#[derive(Debug, Serialize)]
pub struct ListBookmarks {
    pub channel_id: String,
}

// ==================== USERGROUPS ====================

#[derive(Debug, Default, Serialize)]
pub struct CreateUsergroup {
    pub name: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub description: Option<String>,
    #[serde(
        skip_serializing_if = "is_empty_list",
        serialize_with = "comma_joined_opt"
    )]
    pub channels: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ListUsergroups {
    pub include_disabled: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateUsergroup {
    pub usergroup: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DisableUsergroup {
    pub usergroup: String,
}

// ==================== TEAM, EMOJI, DND ====================

#[derive(Debug, Default, Serialize)]
pub struct TeamInfo {}

#[derive(Debug, Default, Serialize)]
pub struct TeamProfile {}

#[derive(Debug, Default, Serialize)]
pub struct EmojiList {}

#[derive(Debug, Default, Serialize)]
pub struct DndInfo {
    #[serde(skip_serializing_if = "is_blank")]
    pub user: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct DndTeamInfo {
    #[serde(
        skip_serializing_if = "is_empty_list",
        serialize_with = "comma_joined_opt"
    )]
    pub users: Option<Vec<String>>,
}

slack_request! {
    AuthTest => AuthTest,

    PostMessage => ChatPostMessage,
    UpdateMessage => ChatUpdate,
    DeleteMessage => ChatDelete,
    ScheduleMessage => ChatScheduleMessage,

    ListConversations => ConversationsList,
    ConversationInfo => ConversationsInfo,
    CreateConversation => ConversationsCreate,
    JoinConversation => ConversationsJoin,
    LeaveConversation => ConversationsLeave,
    InviteToConversation => ConversationsInvite,
    KickFromConversation => ConversationsKick,
    SetConversationTopic => ConversationsSetTopic,
    SetConversationPurpose => ConversationsSetPurpose,
    ArchiveConversation => ConversationsArchive,
    UnarchiveConversation => ConversationsUnarchive,
    ConversationHistory => ConversationsHistory,
    ConversationReplies => ConversationsReplies,

    ListUsers => UsersList,
    UserInfo => UsersInfo,
    UserProfile => UsersProfileGet,
    SetPresence => UsersSetPresence,

    GetUploadUrlExternal => FilesGetUploadUrlExternal,
    CompleteUploadExternal => FilesCompleteUploadExternal,
    ListFiles => FilesList,
    FileInfo => FilesInfo,
    DeleteFile => FilesDelete,

    AddReaction => ReactionsAdd,
    RemoveReaction => ReactionsRemove,
    GetReactions => ReactionsGet,

    AddPin => PinsAdd,
    RemovePin => PinsRemove,
    ListPins => PinsList,

    AddBookmark => BookmarksAdd,
    RemoveBookmark => BookmarksRemove,
    ListBookmarks => BookmarksList,

    CreateUsergroup => UsergroupsCreate,
    ListUsergroups => UsergroupsList,
    UpdateUsergroup => UsergroupsUpdate,
    DisableUsergroup => UsergroupsDisable,

    TeamInfo => TeamInfo,
    TeamProfile => TeamProfileGet,
    EmojiList => EmojiList,
    DndInfo => DndInfo,
    DndTeamInfo => DndTeamInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_post_message_omits_absent_optionals() {
        let request = PostMessage {
            channel: "C123".to_string(),
            text: Some("hi".to_string()),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"channel": "C123", "text": "hi"})
        );
    }

    #[test]
    fn test_blank_optionals_are_omitted() {
        let request = UpdateMessage {
            channel: "C1".to_string(),
            ts: "1.0".to_string(),
            text: Some(String::new()),
            blocks: Some(vec![]),
            attachments: None,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"channel": "C1", "ts": "1.0"})
        );
    }

    #[test]
    fn test_required_empty_string_is_kept() {
        let request = SetConversationTopic {
            channel: "C1".to_string(),
            topic: String::new(),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"channel": "C1", "topic": ""})
        );
    }

    #[test]
    fn test_id_lists_are_comma_joined() {
        let invite = InviteToConversation {
            channel: "C1".to_string(),
            users: vec!["U1".to_string(), "U2".to_string()],
        };
        let dnd = DndTeamInfo {
            users: Some(vec!["U1".to_string(), "U3".to_string()]),
        };

        assert_eq!(serde_json::to_value(&invite).unwrap()["users"], "U1,U2");
        assert_eq!(serde_json::to_value(&dnd).unwrap(), json!({"users": "U1,U3"}));
        assert_eq!(
            serde_json::to_value(DndTeamInfo::default()).unwrap(),
            json!({})
        );
    }

    #[test]
    fn test_bookmark_kind_serializes_as_type() {
        let request = AddBookmark {
            channel_id: "C1".to_string(),
            title: "Docs".to_string(),
            kind: "link".to_string(),
            link: Some("https://example.com".to_string()),
            emoji: None,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"channel_id": "C1", "title": "Docs", "type": "link", "link": "https://example.com"})
        );
    }

    #[test]
    fn test_presence_round_trips_lowercase() {
        let presence: Presence = serde_json::from_value(json!("away")).unwrap();
        assert_eq!(presence, Presence::Away);
        assert_eq!(
            serde_json::to_value(SetPresence { presence }).unwrap(),
            json!({"presence": "away"})
        );
        assert!(serde_json::from_value::<Presence>(json!("busy")).is_err());
    }

    #[test]
    fn test_shared_bodies_bind_distinct_methods() {
        assert_eq!(JoinConversation::METHOD, SlackMethod::ConversationsJoin);
        assert_eq!(LeaveConversation::METHOD, SlackMethod::ConversationsLeave);
        assert_eq!(ListPins::METHOD, SlackMethod::PinsList);
        assert_eq!(AddPin::METHOD, SlackMethod::PinsAdd);
        assert_eq!(GetReactions::METHOD, SlackMethod::ReactionsGet);
        assert_eq!(RemoveReaction::METHOD, SlackMethod::ReactionsRemove);
    }

    #[test]
    fn test_empty_bodies_serialize_to_empty_object() {
        assert_eq!(serde_json::to_value(AuthTest::default()).unwrap(), json!({}));
        assert_eq!(serde_json::to_value(EmojiList::default()).unwrap(), json!({}));
    }
}
