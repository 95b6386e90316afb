// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use crate::domain::parties::models::{
    AcceptPartyInvitationCompletionResult, CreatePartyCompletionResult, DataValue,
    InvalidPresencePermissions, InvitationResponse, InvitePermissions, JoinPartyCompletionResult,
    JoinRequestAction, KickMemberCompletionResult, LeavePartyCompletionResult,
    MemberChangedReason, MemberExitedReason, MemberList, Party, PartyConfiguration, PartyData,
    PartyError, PartyInvite, PartyJoinInfo, PartyMember, PartyState, PendingJoinRequest,
    PermissionType, PresencePermissions, PromoteMemberCompletionResult,
    RejectPartyInvitationCompletionResult, RequestPartyInvitationCompletionResult,
    SendPartyInvitationCompletionResult, UpdateConfigCompletionResult,
};
pub use crate::domain::shared::models::{
    PartyId, PartyTypeId, RequestId, RoomId, UserId, UserProfile,
};
