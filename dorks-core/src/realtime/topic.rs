// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Topic classification of inbound frames.

use std::fmt;
use std::str::FromStr;

use super::frame::{InboundFrame, TAG_CHAT_MESSAGE, TAG_NOTIFICATION, TAG_TIP};

/// Named category of realtime event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Message,
    Strike,
    DeleteMessage,
    MemberJoin,
    MemberLeave,
    ChatInvite,
    BackgroundChange,
    TitleChange,
    ThumbnailChange,
    VoiceChat,
    VideoChat,
    VoiceChatEnd,
    VideoChatEnd,
    ContentChange,
    ScreenRoomStart,
    ScreenRoomEnd,
    HostTransfer,
    RemoveMessage,
    ModRemoveMessage,
    Tip,
    PinAnnounce,
    ViewOnly,
    ViewOnlyEnd,
    UnpinAnnounce,
    TipsEnable,
    TipsDisable,
    Notify,
}

/// Chat message sub-types and their topics.
const CHAT_TOPICS: &[(i64, Topic)] = &[
    (0, Topic::Message),
    (1, Topic::Strike),
    (100, Topic::DeleteMessage),
    (101, Topic::MemberJoin),
    (102, Topic::MemberLeave),
    (103, Topic::ChatInvite),
    (104, Topic::BackgroundChange),
    (105, Topic::TitleChange),
    (106, Topic::ThumbnailChange),
    (107, Topic::VoiceChat),
    (108, Topic::VideoChat),
    (110, Topic::VoiceChatEnd),
    (111, Topic::VideoChatEnd),
    (113, Topic::ContentChange),
    (114, Topic::ScreenRoomStart),
    (115, Topic::ScreenRoomEnd),
    (116, Topic::HostTransfer),
    (118, Topic::RemoveMessage),
    (119, Topic::ModRemoveMessage),
    (120, Topic::Tip),
    (121, Topic::PinAnnounce),
    (125, Topic::ViewOnly),
    (126, Topic::ViewOnlyEnd),
    (127, Topic::UnpinAnnounce),
    (128, Topic::TipsEnable),
    (129, Topic::TipsDisable),
];

/// Frame tags other than chat messages.
const TAG_TOPICS: &[(i64, Topic)] = &[(TAG_NOTIFICATION, Topic::Notify), (TAG_TIP, Topic::Tip)];

impl Topic {
    pub const ALL: [Topic; 27] = [
        Topic::Message,
        Topic::Strike,
        Topic::DeleteMessage,
        Topic::MemberJoin,
        Topic::MemberLeave,
        Topic::ChatInvite,
        Topic::BackgroundChange,
        Topic::TitleChange,
        Topic::ThumbnailChange,
        Topic::VoiceChat,
        Topic::VideoChat,
        Topic::VoiceChatEnd,
        Topic::VideoChatEnd,
        Topic::ContentChange,
        Topic::ScreenRoomStart,
        Topic::ScreenRoomEnd,
        Topic::HostTransfer,
        Topic::RemoveMessage,
        Topic::ModRemoveMessage,
        Topic::Tip,
        Topic::PinAnnounce,
        Topic::ViewOnly,
        Topic::ViewOnlyEnd,
        Topic::UnpinAnnounce,
        Topic::TipsEnable,
        Topic::TipsDisable,
        Topic::Notify,
    ];

    /// Wire name of the topic.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Message => "message",
            Topic::Strike => "strike",
            Topic::DeleteMessage => "deleteMessage",
            Topic::MemberJoin => "memberJoin",
            Topic::MemberLeave => "memberLeave",
            Topic::ChatInvite => "chatInvite",
            Topic::BackgroundChange => "backgroundChange",
            Topic::TitleChange => "titleChange",
            Topic::ThumbnailChange => "thumbnailChange",
            Topic::VoiceChat => "voiceChat",
            Topic::VideoChat => "videoChat",
            Topic::VoiceChatEnd => "voiceChatEnd",
            Topic::VideoChatEnd => "videoChatEnd",
            Topic::ContentChange => "contentChange",
            Topic::ScreenRoomStart => "screenRoomStart",
            Topic::ScreenRoomEnd => "screenRoomEnd",
            Topic::HostTransfer => "hostTransfer",
            Topic::RemoveMessage => "removeMessage",
            Topic::ModRemoveMessage => "modRemoveMessage",
            Topic::Tip => "tip",
            Topic::PinAnnounce => "pinAnnounce",
            Topic::ViewOnly => "viewOnly",
            Topic::ViewOnlyEnd => "viewOnlyEnd",
            Topic::UnpinAnnounce => "unpinAnnounce",
            Topic::TipsEnable => "tipsEnable",
            Topic::TipsDisable => "tipsDisable",
            Topic::Notify => "notify",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown topic: {}", s))
    }
}

/// Maps a frame to its topic.
///
/// Chat frames with an unknown sub-type fall back to [`Topic::Message`].
/// Returns `None` for unknown tags.
pub fn classify(frame: &InboundFrame) -> Option<Topic> {
    if frame.t == TAG_CHAT_MESSAGE {
        let topic = frame
            .message_type()
            .and_then(|kind| lookup(CHAT_TOPICS, kind))
            .unwrap_or(Topic::Message);
        return Some(topic);
    }

    lookup(TAG_TOPICS, frame.t)
}

fn lookup(table: &[(i64, Topic)], key: i64) -> Option<Topic> {
    table.iter().find(|(k, _)| *k == key).map(|(_, t)| *t)
}
