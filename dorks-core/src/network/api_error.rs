// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! API Error Table
//!
//! Maps the numeric status codes carried in `api:statuscode` to a stable name
//! and a human-readable message.

use std::fmt;

/// Static `(code, name, message)` table, sorted by code.
static ERROR_TABLE: &[(i64, &str, &str)] = &[
    (100, "UnsupportedService", "Unsupported service. Your client may be out of date. Please update it to the latest version."),
    (102, "FileTooLarge", "File too large."),
    (103, "InvalidRequest", "Invalid Request. Please update to the latest version. If the problem continues, please contact us."),
    (104, "InvalidRequest", "Invalid Request. Please update to the latest version. If the problem continues, please contact us."),
    (105, "InvalidSession", "Invalid session."),
    (106, "AccessDenied", "Access denied."),
    (107, "UnexistentData", "The requested data does not exist."),
    (110, "ActionNotAllowed", "Action not allowed."),
    (111, "ServiceUnderMaintenance", "Sorry, this service is under maintenance. Please check back later."),
    (113, "MessageNeeded", "Be more specific, please."),
    (200, "InvalidAccountOrPassword", "Invalid account or password."),
    (210, "AccountDisabled", "This account is disabled."),
    (213, "InvalidEmail", "Invalid email address."),
    (214, "InvalidPassword", "Invalid password. Password must be 6 characters or more and contain no spaces."),
    (215, "EmailAlreadyTaken", "This email is already taken or not supported."),
    (216, "AccountDoesntExist", "Account does not exist."),
    (218, "InvalidDevice", "Error! Your device is currently not supported, or the app is out of date. Please update to the latest version."),
    (219, "AccountLimitReached", "A maximum of 3 accounts can be created from this device or too many requests. Try again later."),
    (221, "CantFollowYourself", "You cant follow yourself."),
    (225, "UserUnavailable", "This user is unavailable."),
    (229, "YouAreBanned", "You are banned."),
    (230, "UserNotMemberOfCommunity", "You have to join this Community first."),
    (235, "RequestRejected", "Request rejected. You have been temporarily muted (read only mode) because you have received a strike. To learn more, please check the Help Center."),
    (238, "ActivateAccount", "Please activate your account first. Check your email, including your spam folder."),
    (239, "CantLeaveCommunity", "Sorry, you can not do this before transferring your Agent status to another member."),
    (240, "ReachedTitleLength", "Sorry, the max length of members title is limited to 20."),
    (246, "AccountDeleted", "Account has been deleted."),
    (251, "ApiErrEmailNoPassword", "Email has no password set."),
    (257, "ApiErrCommunityUserCreatedCommunitiesVerify", "Community creation requires verification."),
    (262, "ReachedMaxTitles", "You can only add up to 20 Titles. Please choose the most relevant ones."),
    (270, "VerificationRequired", "Verification Required."),
    (271, "ApiErrInvalidAuthNewDeviceLink", "Invalid authentication for new device link."),
    (291, "CommandCooldown", "Whoa there! Youve done too much too quickly. Take a break and try again later."),
    (293, "UserBannedByTeamAmino", "Sorry, this user has been banned by Team Amino."),
    (300, "BadImage", "Invalid or corrupted image."),
    (313, "InvalidThemepack", "Invalid theme pack."),
    (314, "InvalidVoiceNote", "Invalid voice note."),
    (500, "RequestedNoLongerExists", "Sorry, the requested data no longer exists. Try refreshing the view."),
    (503, "PageRepostedTooRecently", "Sorry, you have reported this page too recently."),
    (551, "InsufficientLevel", "This post type is restricted to members with a higher level."),
    (700, "RequestedNoLongerExists", "Sorry, the requested data no longer exists. Try refreshing the view."),
    (702, "WallCommentingDisabled", "This member has disabled commenting on their wall."),
    (801, "CommunityNoLongerExists", "This Community no longer exists."),
    (802, "InvalidCodeOrLink", "Sorry, this code or link is invalid."),
    (805, "CommunityNameAlreadyTaken", "Community name is already taken."),
    (806, "CommunityCreateLimitReached", "You have reached the limit for community creation."),
    (814, "CommunityDisabled", "This Community is disabled."),
    (833, "CommunityDeleted", "This Community has been deleted."),
    (1501, "DuplicatePollOption", "Sorry, you have duplicate poll options."),
    (1507, "ReachedMaxPollOptions", "Sorry, you can only join or add up to 5 of your items per poll."),
    (1600, "RequestedNoLongerExists", "Sorry, the requested data no longer exists. Try refreshing the view."),
    (1602, "TooManyChats", "Sorry, you can only have up to 1000 chat sessions."),
    (1605, "ChatFull", "Chat is full."),
    (1606, "TooManyInviteUsers", "Sorry, you can only invite up to 999 people."),
    (1611, "ChatInvitesDisabled", "This user has disabled chat invite requests."),
    (1612, "RemovedFromChat", "Youve been removed from this chatroom."),
    (1613, "UserNotJoined", "Sorry, this user has not joined."),
    (1627, "ApiErrChatVvchatNoMoreReputations", "No more reputations available for voice chat."),
    (1637, "MemberKickedByOrganizer", "This member was previously kicked by the organizer and cannot be reinvited."),
    (1661, "LevelFiveRequiredToEnableProps", "Level 5 or higher is required to enable props."),
    (1663, "ChatViewOnly", "Chat is in view-only mode."),
    (1664, "ChatMessageTooBig", "Chat message is too big."),
    (1900, "InviteCodeNotFound", "Sorry, the requested data no longer exists. Try refreshing the view."),
    (2001, "AlreadyRequestedJoinCommunity", "Sorry, you have already submitted a membership request."),
    (2501, "ApiErrPushServerLimitationApart", "Push server limitation: apart."),
    (2502, "ApiErrPushServerLimitationCount", "Push server limitation: count."),
    (2503, "ApiErrPushServerLinkNotInCommunity", "Push server link is not in community."),
    (2504, "ApiErrPushServerLimitationTime", "Push server limitation: time."),
    (2601, "AlreadyCheckedIn", "Sorry, you cant check in any more."),
    (2611, "AlreadyUsedMonthlyRepair", "Monthly repair already used."),
    (2800, "AccountAlreadyRestored", "Account already restored."),
    (3102, "IncorrectVerificationCode", "Incorrect verification code."),
    (3905, "NotOwnerOfChatBubble", "You are not the owner of this chat bubble."),
    (4300, "NotEnoughCoins", "Not enough coins."),
    (4400, "AlreadyPlayedLottery", "You have played the maximum number of lucky draws."),
    (4500, "CannotSendCoins", "Cannot send coins."),
    (4501, "CannotSendCoins", "Cannot send coins."),
    (6001, "AminoIDAlreadyChanged", "Amino ID cannot be changed after you set it."),
    (6002, "InvalidAminoID", "Invalid Amino ID."),
    (11001, "InvalidRequest", "Invalid Request. Please update to the latest version. If the problem continues, please contact us."),
    (99001, "InvalidName", "Sorry, the name is invalid."),
];

/// Codes after which the current session must be considered dead.
const AUTH_CODES: &[i64] = &[105, 200, 210, 218, 246, 270, 293];

/// Non-zero status returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    code: i64,
    name: &'static str,
    message: String,
}

impl ApiError {
    /// Looks up `code` in the static table.
    ///
    /// Unknown codes yield a generic error that still carries the raw code.
    pub fn from_code(code: i64) -> Self {
        match ERROR_TABLE.binary_search_by_key(&code, |(c, _, _)| *c) {
            Ok(index) => {
                let (_, name, message) = ERROR_TABLE[index];
                ApiError {
                    code,
                    name,
                    message: message.to_string(),
                }
            }
            Err(_) => ApiError {
                code,
                name: "UnknownApiError",
                message: format!("Unknown API error code: {}", code),
            },
        }
    }

    /// Returns the numeric status code.
    pub fn code(&self) -> i64 {
        self.code
    }

    /// Returns the stable error name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true if the code is in the static table.
    pub fn is_known(&self) -> bool {
        ERROR_TABLE
            .binary_search_by_key(&self.code, |(c, _, _)| *c)
            .is_ok()
    }

    /// Returns true for codes that invalidate the current session.
    pub fn is_auth_error(&self) -> bool {
        AUTH_CODES.contains(&self.code)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
