// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use completion_results::{
    AcceptPartyInvitationCompletionResult, CreatePartyCompletionResult, InvitationResponse,
    JoinPartyCompletionResult, KickMemberCompletionResult, LeavePartyCompletionResult,
    MemberChangedReason, MemberExitedReason, PromoteMemberCompletionResult,
    RejectPartyInvitationCompletionResult, RequestPartyInvitationCompletionResult,
    SendPartyInvitationCompletionResult, UpdateConfigCompletionResult,
};
pub use invite::PartyInvite;
pub use join_info::PartyJoinInfo;
pub use join_submission::JoinSubmission;
pub use member_list::{MemberList, PartyMember};
pub use party::{Party, PartyInfo, PendingJoinRequest};
pub use party_configuration::{InvitePermissions, JoinRequestAction, PartyConfiguration};
pub use party_data::{DataValue, PartyData};
pub use party_error::PartyError;
pub use party_state::PartyState;
pub use pending_operation::{
    CreatePartyCallback, JoinPartyCallback, KickMemberCallback, LeavePartyCallback,
    PendingOperation, PromoteMemberCallback, RequestInvitationCallback, SendInvitationCallback,
    UpdatePartyCallback,
};
pub use presence_permissions::{InvalidPresencePermissions, PermissionType, PresencePermissions};

mod completion_results;
mod invite;
mod join_info;
mod join_submission;
mod member_list;
mod party;
mod party_configuration;
mod party_data;
mod party_error;
mod party_state;
mod pending_operation;
mod presence_permissions;
