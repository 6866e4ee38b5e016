use std::fmt;

/// Every Slack Web API method this server calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlackMethod {
    AuthTest,

    ChatPostMessage,
    ChatUpdate,
    ChatDelete,
    ChatScheduleMessage,

    ConversationsList,
    ConversationsInfo,
    ConversationsCreate,
    ConversationsJoin,
    ConversationsLeave,
    ConversationsInvite,
    ConversationsKick,
    ConversationsSetTopic,
    ConversationsSetPurpose,
    ConversationsArchive,
    ConversationsUnarchive,
    ConversationsHistory,
    ConversationsReplies,

    UsersList,
    UsersInfo,
    UsersProfileGet,
    UsersSetPresence,

    FilesGetUploadUrlExternal,
    FilesCompleteUploadExternal,
    FilesList,
    FilesInfo,
    FilesDelete,

    ReactionsAdd,
    ReactionsRemove,
    ReactionsGet,

    PinsAdd,
    PinsRemove,
    PinsList,

    BookmarksAdd,
    BookmarksRemove,
    BookmarksList,

    UsergroupsCreate,
    UsergroupsList,
    UsergroupsUpdate,
    UsergroupsDisable,

    TeamInfo,
    TeamProfileGet,

    EmojiList,

    DndInfo,
    DndTeamInfo,
}

impl SlackMethod {
    /// Wire name, appended to the API base URL
    pub fn as_str(&self) -> &'static str {
        match self {
            SlackMethod::AuthTest => "auth.test",

            SlackMethod::ChatPostMessage => "chat.postMessage",
            SlackMethod::ChatUpdate => "chat.update",
            SlackMethod::ChatDelete => "chat.delete",
            SlackMethod::ChatScheduleMessage => "chat.scheduleMessage",

            SlackMethod::ConversationsList => "conversations.list",
            SlackMethod::ConversationsInfo => "conversations.info",
            SlackMethod::ConversationsCreate => "conversations.create",
            SlackMethod::ConversationsJoin => "conversations.join",
            SlackMethod::ConversationsLeave => "conversations.leave",
            SlackMethod::ConversationsInvite => "conversations.invite",
            SlackMethod::ConversationsKick => "conversations.kick",
            SlackMethod::ConversationsSetTopic => "conversations.setTopic",
            SlackMethod::ConversationsSetPurpose => "conversations.setPurpose",
            SlackMethod::ConversationsArchive => "conversations.archive",
            SlackMethod::ConversationsUnarchive => "conversations.unarchive",
            SlackMethod::ConversationsHistory => "conversations.history",
            SlackMethod::ConversationsReplies => "conversations.replies",

            SlackMethod::UsersList => "users.list",
            SlackMethod::UsersInfo => "users.info",
            SlackMethod::UsersProfileGet => "users.profile.get",
            SlackMethod::UsersSetPresence => "users.setPresence",

            SlackMethod::FilesGetUploadUrlExternal => "files.getUploadURLExternal",
            SlackMethod::FilesCompleteUploadExternal => "files.completeUploadExternal",
            SlackMethod::FilesList => "files.list",
            SlackMethod::FilesInfo => "files.info",
            SlackMethod::FilesDelete => "files.delete",

            SlackMethod::ReactionsAdd => "reactions.add",
            SlackMethod::ReactionsRemove => "reactions.remove",
            SlackMethod::ReactionsGet => "reactions.get",

            SlackMethod::PinsAdd => "pins.add",
            SlackMethod::PinsRemove => "pins.remove",
            SlackMethod::PinsList => "pins.list",

            SlackMethod::BookmarksAdd => "bookmarks.add",
            SlackMethod::BookmarksRemove => "bookmarks.remove",
            SlackMethod::BookmarksList => "bookmarks.list",

            SlackMethod::UsergroupsCreate => "usergroups.create",
            SlackMethod::UsergroupsList => "usergroups.list",
            SlackMethod::UsergroupsUpdate => "usergroups.update",
            SlackMethod::UsergroupsDisable => "usergroups.disable",

            SlackMethod::TeamInfo => "team.info",
            SlackMethod::TeamProfileGet => "team.profile.get",

            SlackMethod::EmojiList => "emoji.list",

            SlackMethod::DndInfo => "dnd.info",
            SlackMethod::DndTeamInfo => "dnd.teamInfo",
        }
    }
}

impl fmt::Display for SlackMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
