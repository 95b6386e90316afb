// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use tracing::warn;

use crate::app::deps::{
    DynAppContext, DynConnectedPartiesRepository, DynPartiesDomainService,
    DynPartyPresenceService,
};
use crate::domain::parties::models::{
    CreatePartyCompletionResult, JoinPartyCompletionResult, KickMemberCompletionResult,
    LeavePartyCompletionResult, Party, PartyConfiguration, PartyData, PartyError, PartyJoinInfo,
    PartyMember, PromoteMemberCompletionResult, UpdateConfigCompletionResult,
};
use crate::domain::shared::models::{PartyId, PartyTypeId, UserId, UserProfile};

/// Party lifecycle, configuration and data operations plus the synchronous
/// queries over the local cache. Queries never touch the network and report
/// absence as `None` or an empty list.
pub struct PartiesService {
    pub(crate) ctx: DynAppContext,
    pub(crate) parties_repo: DynConnectedPartiesRepository,
    pub(crate) presence_service: DynPartyPresenceService,
    pub(crate) parties_domain_service: DynPartiesDomainService,
}

impl PartiesService {
    /// Starts creating a new party. Returns `true` if the operation is in
    /// flight; `callback` then fires exactly once.
    pub fn create_party(
        &self,
        local_user_id: &UserId,
        party_type_id: PartyTypeId,
        config: PartyConfiguration,
        callback: impl FnOnce(&UserId, Option<&PartyId>, CreatePartyCompletionResult)
            + Send
            + 'static,
    ) -> bool {
        self.parties_domain_service.create_party(
            local_user_id,
            party_type_id,
            config,
            Box::new(callback),
        )
    }

    /// Replaces the party's configuration wholesale, optionally rotating its
    /// access key.
    pub fn update_party(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        config: PartyConfiguration,
        regenerate_access_key: bool,
        callback: impl FnOnce(&UserId, &PartyId, UpdateConfigCompletionResult) + Send + 'static,
    ) -> bool {
        self.parties_domain_service.update_party(
            local_user_id,
            party_id,
            config,
            regenerate_access_key,
            Box::new(callback),
        )
    }

    pub fn join_party(
        &self,
        local_user_id: &UserId,
        join_info: &PartyJoinInfo,
        callback: impl FnOnce(&UserId, &PartyId, JoinPartyCompletionResult, i32) + Send + 'static,
    ) -> bool {
        self.parties_domain_service
            .join_party(local_user_id, join_info, Box::new(callback))
    }

    pub fn leave_party(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        callback: impl FnOnce(&UserId, &PartyId, LeavePartyCompletionResult) + Send + 'static,
    ) -> bool {
        self.parties_domain_service
            .leave_party(local_user_id, party_id, Box::new(callback))
    }

    /// Leader-side decision on a pending join request. `denied_result_code`
    /// is handed to the requester verbatim when denying.
    pub fn approve_join_request(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        requester_id: &UserId,
        approve: bool,
        denied_result_code: i32,
    ) -> bool {
        self.parties_domain_service.approve_join_request(
            local_user_id,
            party_id,
            requester_id,
            approve,
            denied_result_code,
        )
    }

    pub fn kick_member(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        target_member_id: &UserId,
        callback: impl FnOnce(&UserId, &PartyId, &UserId, KickMemberCompletionResult)
            + Send
            + 'static,
    ) -> bool {
        self.parties_domain_service.kick_member(
            local_user_id,
            party_id,
            target_member_id,
            Box::new(callback),
        )
    }

    pub fn promote_member(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        target_member_id: &UserId,
        callback: impl FnOnce(&UserId, &PartyId, &UserId, PromoteMemberCompletionResult)
            + Send
            + 'static,
    ) -> bool {
        self.parties_domain_service.promote_member(
            local_user_id,
            party_id,
            target_member_id,
            Box::new(callback),
        )
    }

    /// Replaces the party-wide data blob and broadcasts it. Last write wins,
    /// no history is kept.
    pub fn update_party_data(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        data: PartyData,
    ) -> bool {
        self.parties_domain_service
            .update_party_data(local_user_id, party_id, data)
    }

    /// Replaces the local user's member data blob and broadcasts it.
    pub fn update_party_member_data(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        data: PartyData,
    ) -> bool {
        self.parties_domain_service
            .update_party_member_data(local_user_id, party_id, data)
    }
}

impl PartiesService {
    pub fn is_member_leader(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        member_id: &UserId,
    ) -> bool {
        self.parties_repo
            .get(local_user_id, party_id)
            .map(|party| party.is_leader(member_id))
            .unwrap_or_default()
    }

    pub fn party_member_count(&self, local_user_id: &UserId, party_id: &PartyId) -> usize {
        self.parties_repo
            .get(local_user_id, party_id)
            .map(|party| party.member_count())
            .unwrap_or_default()
    }

    pub fn party(&self, local_user_id: &UserId, party_id: &PartyId) -> Option<Party> {
        self.parties_repo.get(local_user_id, party_id)
    }

    pub fn party_of_type(
        &self,
        local_user_id: &UserId,
        party_type_id: &PartyTypeId,
    ) -> Option<Party> {
        self.parties_repo.get_by_type(local_user_id, party_type_id)
    }

    pub fn party_member(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        member_id: &UserId,
    ) -> Option<PartyMember> {
        self.parties_repo
            .get(local_user_id, party_id)?
            .with_members(|members| members.get(member_id).cloned())
    }

    pub fn party_data(&self, local_user_id: &UserId, party_id: &PartyId) -> Option<PartyData> {
        Some(self.parties_repo.get(local_user_id, party_id)?.party_data())
    }

    pub fn party_member_data(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        member_id: &UserId,
    ) -> Option<PartyData> {
        self.party_member(local_user_id, party_id, member_id)
            .map(|member| member.data)
    }

    /// The party of the given type that `user_id` is advertising via
    /// presence, if visible to the local user.
    pub fn advertised_party(
        &self,
        local_user_id: &UserId,
        user_id: &UserId,
        party_type_id: &PartyTypeId,
    ) -> Option<PartyJoinInfo> {
        self.presence_service
            .advertised_party(local_user_id, user_id, party_type_id)
    }

    pub fn joined_parties(&self, local_user_id: &UserId) -> Vec<PartyId> {
        self.parties_repo
            .get_all(local_user_id)
            .into_iter()
            .map(|party| party.party_id.clone())
            .collect()
    }

    pub fn party_members(&self, local_user_id: &UserId, party_id: &PartyId) -> Vec<PartyMember> {
        self.parties_repo
            .get(local_user_id, party_id)
            .map(|party| party.with_members(|members| members.to_vec()))
            .unwrap_or_default()
    }

    /// Users waiting for the local user (the leader) to decide their join
    /// request.
    pub fn pending_join_requests(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
    ) -> Vec<UserProfile> {
        self.parties_repo
            .get(local_user_id, party_id)
            .map(|party| {
                party
                    .pending_join_requests()
                    .iter()
                    .map(|request| request.sender().clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Users the party has invited that have not responded yet.
    pub fn pending_invited_users(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
    ) -> Vec<UserId> {
        self.parties_repo
            .get(local_user_id, party_id)
            .map(|party| party.pending_invited_users())
            .unwrap_or_default()
    }
}

impl PartiesService {
    pub fn make_join_info(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
    ) -> Option<PartyJoinInfo> {
        self.parties_domain_service
            .make_join_info(local_user_id, party_id)
    }

    pub fn make_join_info_json(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
    ) -> Option<String> {
        let join_info = self.make_join_info(local_user_id, party_id)?;
        match join_info.to_json() {
            Ok(json) => Some(json),
            Err(error) => {
                warn!(user = %local_user_id, %party_id, %error, "Failed to encode join info");
                None
            }
        }
    }

    pub fn join_info_from_json(&self, json: &str) -> Result<PartyJoinInfo, PartyError> {
        PartyJoinInfo::from_json(json)
    }

    pub fn token_from_join_info(&self, join_info: &PartyJoinInfo) -> String {
        join_info.to_token()
    }

    pub fn join_info_from_token(&self, token: &str) -> Result<PartyJoinInfo, PartyError> {
        PartyJoinInfo::from_token(token)
    }

    /// Returns and clears the join info supplied on the command line at
    /// process start, if any. One-shot.
    pub fn consume_pending_command_line_invite(&self) -> Option<PartyJoinInfo> {
        self.ctx.consume_pending_command_line_invite()
    }

    /// Logs the state of all known parties of the local user.
    pub fn dump_party_state(&self, local_user_id: &UserId) {
        self.parties_domain_service.dump_party_state(local_user_id)
    }
}
