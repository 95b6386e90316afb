// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use crate::domain::parties::models::{
    CreatePartyCallback, JoinPartyCallback, KickMemberCallback, LeavePartyCallback,
    PartyConfiguration, PartyData, PartyJoinInfo, PromoteMemberCallback,
    RequestInvitationCallback, SendInvitationCallback, UpdatePartyCallback,
};
use crate::domain::parties::services::{PartyPush, PartyRequest, PartyResponse};
use crate::domain::shared::models::{PartyId, PartyTypeId, RequestId, UserId};

/// The coordinator core. Operations return `true` when accepted (the
/// callback fires exactly once later) and `false` on a synchronous
/// precondition rejection (no callback fires).
///
/// Exactly one lifecycle operation (create/join/leave) may be pending per
/// (local user, party). Non-lifecycle operations (kick, promote, data
/// updates) are not serialized against pending lifecycle operations.
///
/// All methods expect to run on a single logical execution context per
/// process; the `handle_*` family is invoked by the transport's receive
/// loop on that same context.
pub trait PartiesDomainService: Send + Sync {
    fn create_party(
        &self,
        local_user_id: &UserId,
        party_type_id: PartyTypeId,
        config: PartyConfiguration,
        callback: CreatePartyCallback,
    ) -> bool;

    fn update_party(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        config: PartyConfiguration,
        regenerate_access_key: bool,
        callback: UpdatePartyCallback,
    ) -> bool;

    fn join_party(
        &self,
        local_user_id: &UserId,
        join_info: &PartyJoinInfo,
        callback: JoinPartyCallback,
    ) -> bool;

    fn leave_party(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        callback: LeavePartyCallback,
    ) -> bool;

    fn approve_join_request(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        requester_id: &UserId,
        approve: bool,
        denied_result_code: i32,
    ) -> bool;

    fn send_invitation(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        recipient_id: &UserId,
        client_data: PartyData,
        callback: SendInvitationCallback,
    ) -> bool;

    fn request_invitation(
        &self,
        local_user_id: &UserId,
        sender_id: &UserId,
        party_id: &PartyId,
        callback: RequestInvitationCallback,
    ) -> bool;

    fn accept_invitation(&self, local_user_id: &UserId, sender_id: &UserId) -> bool;

    fn reject_invitation(&self, local_user_id: &UserId, sender_id: &UserId) -> bool;

    fn kick_member(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        target_member_id: &UserId,
        callback: KickMemberCallback,
    ) -> bool;

    fn promote_member(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        target_member_id: &UserId,
        callback: PromoteMemberCallback,
    ) -> bool;

    fn update_party_data(&self, local_user_id: &UserId, party_id: &PartyId, data: PartyData)
        -> bool;

    fn update_party_member_data(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        data: PartyData,
    ) -> bool;

    /// Builds the join info another user would need to enter the given party.
    fn make_join_info(&self, local_user_id: &UserId, party_id: &PartyId)
        -> Option<PartyJoinInfo>;

    fn handle_response(&self, local_user_id: &UserId, request_id: &RequestId, response: PartyResponse);

    fn handle_request_timed_out(&self, local_user_id: &UserId, request_id: &RequestId);

    fn handle_request(
        &self,
        local_user_id: &UserId,
        request_id: &RequestId,
        sender: &UserId,
        request: PartyRequest,
    );

    fn handle_push(&self, local_user_id: &UserId, sender: &UserId, push: PartyPush);

    fn handle_connection_status_changed(&self, local_user_id: &UserId, connected: bool);

    /// Logs the state of every cached party for debugging.
    fn dump_party_state(&self, local_user_id: &UserId);
}
