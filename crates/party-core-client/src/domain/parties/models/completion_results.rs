// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

//! Closed result enumerations for every asynchronous party operation.
//!
//! The numbering is a stable contract other layers depend on for logging and
//! telemetry: client-local failures occupy the negative band counting up from
//! -100, `0` is always `UnknownInternalFailure` and `1` is `Succeeded`.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[repr(i32)]
pub enum CreatePartyCompletionResult {
    UnknownClientFailure = -100,
    AlreadyInPartyOfSpecifiedType = -99,
    AlreadyCreatingParty = -98,
    AlreadyInParty = -97,
    FailedToCreateRoom = -96,
    NoResponse = -95,
    UnknownInternalFailure = 0,
    Succeeded = 1,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[repr(i32)]
pub enum JoinPartyCompletionResult {
    UnknownClientFailure = -100,
    BadBuild = -99,
    JoinInfoInvalid = -98,
    AlreadyInPartyOfSpecifiedType = -97,
    AlreadyJoiningParty = -96,
    AlreadyInParty = -95,
    MessagingFailure = -94,
    PartyNotInPendingState = -93,
    ResponseFromUnexpectedUser = -92,
    NoSpace = -91,
    NotApproved = -90,
    RequesteeNotMember = -89,
    RequesteeNotLeader = -88,
    NoResponse = -87,
    UnknownInternalFailure = 0,
    Succeeded = 1,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[repr(i32)]
pub enum LeavePartyCompletionResult {
    UnknownClientFailure = -100,
    LeavePending = -99,
    UnknownLocalUser = -98,
    UnknownParty = -97,
    NotMember = -96,
    MessagingFailure = -95,
    NoResponse = -94,
    UnknownTransportFailure = -93,
    UnknownInternalFailure = 0,
    Succeeded = 1,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[repr(i32)]
pub enum UpdateConfigCompletionResult {
    UnknownClientFailure = -100,
    UnknownParty = -99,
    LocalMemberNotMember = -98,
    LocalMemberNotLeader = -97,
    RemoteMemberNotMember = -96,
    MessagingFailure = -95,
    NoResponse = -94,
    UnknownInternalFailure = 0,
    Succeeded = 1,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[repr(i32)]
pub enum RequestPartyInvitationCompletionResult {
    NotLoggedIn = -100,
    InvitePending = -99,
    AlreadyInParty = -98,
    PartyFull = -97,
    NoPermission = -96,
    UnknownInternalFailure = 0,
    Succeeded = 1,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[repr(i32)]
pub enum SendPartyInvitationCompletionResult {
    NotLoggedIn = -100,
    InvitePending = -99,
    AlreadyInParty = -98,
    PartyFull = -97,
    NoPermission = -96,
    UnknownInternalFailure = 0,
    Succeeded = 1,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[repr(i32)]
pub enum AcceptPartyInvitationCompletionResult {
    NotLoggedIn = -100,
    InvitePending = -99,
    AlreadyInParty = -98,
    PartyFull = -97,
    NoPermission = -96,
    UnknownInternalFailure = 0,
    Succeeded = 1,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[repr(i32)]
pub enum RejectPartyInvitationCompletionResult {
    NotLoggedIn = -100,
    InvitePending = -99,
    AlreadyInParty = -98,
    PartyFull = -97,
    NoPermission = -96,
    UnknownInternalFailure = 0,
    Succeeded = 1,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[repr(i32)]
pub enum KickMemberCompletionResult {
    UnknownClientFailure = -100,
    UnknownParty = -99,
    LocalMemberNotMember = -98,
    LocalMemberNotLeader = -97,
    RemoteMemberNotMember = -96,
    MessagingFailure = -95,
    NoResponse = -94,
    UnknownInternalFailure = 0,
    Succeeded = 1,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[repr(i32)]
pub enum PromoteMemberCompletionResult {
    UnknownClientFailure = -100,
    UnknownServiceFailure = -99,
    UnknownParty = -98,
    LocalMemberNotMember = -97,
    LocalMemberNotLeader = -96,
    PromotionAlreadyPending = -95,
    TargetIsSelf = -94,
    TargetNotMember = -93,
    MessagingFailure = -92,
    NoResponse = -91,
    UnknownInternalFailure = 0,
    Succeeded = 1,
}

/// A recipient's answer to a party invitation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
pub enum InvitationResponse {
    UnknownFailure,
    BadBuild,
    Rejected,
    Accepted,
}

/// How a member changed without leaving the party.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
pub enum MemberChangedReason {
    Disconnected,
    Rejoined,
    Promoted,
}

/// Why a member no longer belongs to the party.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
pub enum MemberExitedReason {
    Unknown,
    Left,
    Removed,
    Kicked,
}

macro_rules! impl_result_value {
    ($($name:ident),+) => {
        $(impl $name {
            /// Stable numeric code for logging and telemetry.
            pub fn value(&self) -> i32 {
                *self as i32
            }

            pub fn is_success(&self) -> bool {
                matches!(self, Self::Succeeded)
            }
        })+
    };
}

impl_result_value!(
    CreatePartyCompletionResult,
    JoinPartyCompletionResult,
    LeavePartyCompletionResult,
    UpdateConfigCompletionResult,
    RequestPartyInvitationCompletionResult,
    SendPartyInvitationCompletionResult,
    AcceptPartyInvitationCompletionResult,
    RejectPartyInvitationCompletionResult,
    KickMemberCompletionResult,
    PromoteMemberCompletionResult
);
