// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use itertools::Itertools;
use tracing::{error, info, warn};

use crate::app::deps::{
    DynAppContext, DynClientEventDispatcher, DynConnectedPartiesRepository, DynIDProvider,
    DynInvitesRepository, DynPartyPresenceService, DynPartyTransport,
    DynPendingOperationsRepository,
};
use crate::domain::parties::models::{
    CreatePartyCallback, CreatePartyCompletionResult, InvitationResponse, JoinPartyCallback,
    JoinPartyCompletionResult, JoinRequestAction, JoinSubmission, KickMemberCallback,
    KickMemberCompletionResult, LeavePartyCallback, LeavePartyCompletionResult,
    MemberChangedReason, MemberExitedReason, MemberList, Party, PartyConfiguration, PartyData,
    PartyInvite, PartyJoinInfo, PartyMember, PartyState, PendingJoinRequest, PendingOperation,
    PromoteMemberCallback, PromoteMemberCompletionResult, RequestInvitationCallback,
    RequestPartyInvitationCompletionResult, SendInvitationCallback,
    SendPartyInvitationCompletionResult, UpdateConfigCompletionResult, UpdatePartyCallback,
};
use crate::domain::parties::services::parties_domain_service::PartiesDomainService as PartiesDomainServiceTrait;
use crate::domain::parties::services::{
    PartyPush, PartyRequest, PartyResponse, PartySnapshot, Recipient,
};
use crate::domain::shared::models::{PartyId, PartyTypeId, RequestId, UserId};
use crate::ClientEvent;

pub struct PartiesDomainServiceDependencies {
    pub(crate) ctx: DynAppContext,
    pub(crate) client_event_dispatcher: DynClientEventDispatcher,
    pub(crate) id_provider: DynIDProvider,
    pub(crate) invites_repo: DynInvitesRepository,
    pub(crate) parties_repo: DynConnectedPartiesRepository,
    pub(crate) pending_ops_repo: DynPendingOperationsRepository,
    pub(crate) presence_service: DynPartyPresenceService,
    pub(crate) transport: DynPartyTransport,
}

/// The coordinator. Validates preconditions locally, drives the party state
/// machine, talks to the transport and turns inbound traffic into cache
/// mutations and client events.
///
/// Locks are never held across transport or dispatcher calls; a transport
/// may deliver the response to a request before `send_request` returns.
pub struct PartiesDomainService {
    deps: PartiesDomainServiceDependencies,
}

impl PartiesDomainService {
    pub(crate) fn new(deps: PartiesDomainServiceDependencies) -> Self {
        Self { deps }
    }
}

impl PartiesDomainServiceTrait for PartiesDomainService {
    fn create_party(
        &self,
        local_user_id: &UserId,
        party_type_id: PartyTypeId,
        config: PartyConfiguration,
        callback: CreatePartyCallback,
    ) -> bool {
        if !self.deps.ctx.is_local_user(local_user_id) {
            warn!(user = %local_user_id, "Rejecting create_party. User is not logged in");
            return false;
        }
        if self
            .deps
            .parties_repo
            .get_by_type(local_user_id, &party_type_id)
            .is_some()
        {
            warn!(
                user = %local_user_id, %party_type_id,
                "Rejecting create_party (AlreadyInPartyOfSpecifiedType)"
            );
            return false;
        }
        if self
            .deps
            .pending_ops_repo
            .has_pending_create(local_user_id, &party_type_id)
        {
            warn!(
                user = %local_user_id, %party_type_id,
                "Rejecting create_party (AlreadyCreatingParty)"
            );
            return false;
        }

        let request_id = self.new_request_id();
        self.deps.pending_ops_repo.insert(
            request_id.clone(),
            PendingOperation::Create {
                local_user_id: local_user_id.clone(),
                party_type_id,
                config: config.clone(),
                callback,
            },
        );

        let request = PartyRequest::Create {
            party_type_id,
            config,
        };
        self.send_or_fail(local_user_id, &Recipient::Service, &request_id, request);
        true
    }

    fn update_party(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        config: PartyConfiguration,
        regenerate_access_key: bool,
        callback: UpdatePartyCallback,
    ) -> bool {
        if self
            .require_leader(local_user_id, party_id, "update_party")
            .is_none()
        {
            return false;
        }

        let request_id = self.new_request_id();
        self.deps.pending_ops_repo.insert(
            request_id.clone(),
            PendingOperation::Update {
                local_user_id: local_user_id.clone(),
                party_id: party_id.clone(),
                config: config.clone(),
                callback,
            },
        );

        let request = PartyRequest::Update {
            party_id: party_id.clone(),
            config,
            regenerate_access_key,
        };
        self.send_or_fail(local_user_id, &Recipient::Service, &request_id, request);
        true
    }

    fn join_party(
        &self,
        local_user_id: &UserId,
        join_info: &PartyJoinInfo,
        callback: JoinPartyCallback,
    ) -> bool {
        if !self.deps.ctx.is_local_user(local_user_id) {
            warn!(user = %local_user_id, "Rejecting join_party. User is not logged in");
            return false;
        }
        if !join_info.is_valid() {
            warn!(user = %local_user_id, "Rejecting join_party (JoinInfoInvalid)");
            return false;
        }

        let party_id = join_info.party_id();
        if let Some(party) = self.deps.parties_repo.get(local_user_id, party_id) {
            if party.state() == PartyState::JoinPending {
                warn!(user = %local_user_id, %party_id, "Rejecting join_party (AlreadyJoiningParty)");
            } else {
                warn!(user = %local_user_id, %party_id, "Rejecting join_party (AlreadyInParty)");
            }
            return false;
        }
        if self
            .deps
            .parties_repo
            .get_by_type(local_user_id, &join_info.party_type_id())
            .is_some()
        {
            warn!(
                user = %local_user_id, %party_id,
                "Rejecting join_party (AlreadyInPartyOfSpecifiedType)"
            );
            return false;
        }

        let leader_id = join_info.leader().id.clone();
        let party = Party::joining(
            party_id.clone(),
            join_info.party_type_id(),
            leader_id.clone(),
        );
        if self.deps.parties_repo.set(local_user_id, party).is_err() {
            warn!(user = %local_user_id, %party_id, "Rejecting join_party (AlreadyInParty)");
            return false;
        }

        let submission = JoinSubmission {
            joiner: self.deps.ctx.profile(local_user_id),
            app_id: self.deps.ctx.client_info.app_id.clone(),
            build_id: self.deps.ctx.client_info.build_id.clone(),
            provided_key: join_info.key().map(str::to_string),
            member_data: PartyData::new(),
        };

        let request_id = self.new_request_id();
        self.deps.pending_ops_repo.insert(
            request_id.clone(),
            PendingOperation::Join {
                local_user_id: local_user_id.clone(),
                party_id: party_id.clone(),
                callback,
            },
        );

        let request = PartyRequest::Join {
            party_id: party_id.clone(),
            party_type_id: join_info.party_type_id(),
            submission,
        };
        if !self.send_or_fail(
            local_user_id,
            &Recipient::User(leader_id),
            &request_id,
            request,
        ) {
            self.deps.parties_repo.delete(local_user_id, party_id);
        }
        true
    }

    fn leave_party(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        callback: LeavePartyCallback,
    ) -> bool {
        if !self.deps.ctx.is_local_user(local_user_id) {
            warn!(user = %local_user_id, "Rejecting leave_party (UnknownLocalUser)");
            return false;
        }
        let Some(party) = self.deps.parties_repo.get(local_user_id, party_id) else {
            warn!(user = %local_user_id, %party_id, "Rejecting leave_party (UnknownParty)");
            return false;
        };
        let state = party.state();
        if state == PartyState::LeavePending {
            warn!(user = %local_user_id, %party_id, "Rejecting leave_party (LeavePending)");
            return false;
        }
        if state.is_pending() {
            warn!(
                user = %local_user_id, %party_id, %state,
                "Rejecting leave_party. Another lifecycle operation is pending"
            );
            return false;
        }
        if !party.is_member(local_user_id) {
            warn!(user = %local_user_id, %party_id, "Rejecting leave_party (NotMember)");
            return false;
        }

        if party.is_leader(local_user_id) {
            self.leave_as_leader(local_user_id, &party, callback);
            return true;
        }

        party.set_state(PartyState::LeavePending);

        let request_id = self.new_request_id();
        self.deps.pending_ops_repo.insert(
            request_id.clone(),
            PendingOperation::Leave {
                local_user_id: local_user_id.clone(),
                party_id: party_id.clone(),
                callback,
            },
        );

        let request = PartyRequest::Leave {
            party_id: party_id.clone(),
        };
        if !self.send_or_fail(
            local_user_id,
            &Recipient::User(party.leader()),
            &request_id,
            request,
        ) {
            party.set_state(PartyState::Active);
        }
        true
    }

    fn approve_join_request(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        requester_id: &UserId,
        approve: bool,
        denied_result_code: i32,
    ) -> bool {
        let Some(party) = self.require_leader(local_user_id, party_id, "approve_join_request")
        else {
            return false;
        };
        let Some(request) = party.take_join_request(requester_id) else {
            warn!(
                user = %local_user_id, %party_id, requester = %requester_id,
                "Rejecting approve_join_request. No pending join request from this user"
            );
            return false;
        };

        if approve {
            self.admit_member(local_user_id, &party, &request, true);
        } else {
            self.respond(
                local_user_id,
                requester_id,
                &request.request_id,
                PartyResponse::JoinDenied {
                    result: JoinPartyCompletionResult::NotApproved,
                    not_approved_reason: denied_result_code,
                },
            );
            self.announce_join_decision(local_user_id, &party, requester_id, false);
        }

        self.update_promotion_lockout(local_user_id, &party);
        true
    }

    fn send_invitation(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        recipient_id: &UserId,
        client_data: PartyData,
        callback: SendInvitationCallback,
    ) -> bool {
        if !self.deps.ctx.is_local_user(local_user_id) {
            warn!(user = %local_user_id, "Rejecting send_invitation (NotLoggedIn)");
            return false;
        }
        let Some(party) = self.deps.parties_repo.get(local_user_id, party_id) else {
            warn!(user = %local_user_id, %party_id, "Rejecting send_invitation. Unknown party");
            return false;
        };
        if !party.can_user_invite(local_user_id) {
            warn!(user = %local_user_id, %party_id, "Rejecting send_invitation (NoPermission)");
            return false;
        }
        if party.is_member(recipient_id) {
            warn!(
                user = %local_user_id, %party_id, recipient = %recipient_id,
                "Rejecting send_invitation (AlreadyInParty)"
            );
            return false;
        }
        if party.is_invited_user(recipient_id) {
            warn!(
                user = %local_user_id, %party_id, recipient = %recipient_id,
                "Rejecting send_invitation (InvitePending)"
            );
            return false;
        }
        if !party.config().has_space_for_member(party.member_count()) {
            warn!(user = %local_user_id, %party_id, "Rejecting send_invitation (PartyFull)");
            return false;
        }

        let join_info = self
            .join_info_for_party(local_user_id, &party, true)
            .with_client_data(client_data);
        let invite = PartyInvite::new(self.deps.ctx.profile(local_user_id), join_info);

        let result = match self.deps.transport.push(
            local_user_id,
            recipient_id,
            PartyPush::Invite { invite },
        ) {
            Ok(()) => {
                party.add_invited_user(recipient_id.clone());
                SendPartyInvitationCompletionResult::Succeeded
            }
            Err(error) => {
                warn!(
                    user = %local_user_id, %party_id, recipient = %recipient_id, %error,
                    "Failed to deliver invitation"
                );
                SendPartyInvitationCompletionResult::UnknownInternalFailure
            }
        };

        callback(local_user_id, party_id, recipient_id, result);
        true
    }

    fn request_invitation(
        &self,
        local_user_id: &UserId,
        sender_id: &UserId,
        party_id: &PartyId,
        callback: RequestInvitationCallback,
    ) -> bool {
        if !self.deps.ctx.is_local_user(local_user_id) {
            warn!(user = %local_user_id, "Rejecting request_invitation (NotLoggedIn)");
            return false;
        }
        if self.deps.parties_repo.get(local_user_id, party_id).is_some() {
            warn!(user = %local_user_id, %party_id, "Rejecting request_invitation (AlreadyInParty)");
            return false;
        }

        let push = PartyPush::InviteRequest {
            party_id: party_id.clone(),
            request_for: self.deps.ctx.profile(local_user_id),
        };
        let result = match self.deps.transport.push(local_user_id, sender_id, push) {
            Ok(()) => RequestPartyInvitationCompletionResult::Succeeded,
            Err(error) => {
                warn!(
                    user = %local_user_id, %party_id, recipient = %sender_id, %error,
                    "Failed to deliver invite request"
                );
                RequestPartyInvitationCompletionResult::UnknownInternalFailure
            }
        };

        callback(local_user_id, party_id, result);
        true
    }

    fn accept_invitation(&self, local_user_id: &UserId, sender_id: &UserId) -> bool {
        self.resolve_invitation(local_user_id, sender_id, InvitationResponse::Accepted)
    }

    fn reject_invitation(&self, local_user_id: &UserId, sender_id: &UserId) -> bool {
        self.resolve_invitation(local_user_id, sender_id, InvitationResponse::Rejected)
    }

    fn kick_member(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        target_member_id: &UserId,
        callback: KickMemberCallback,
    ) -> bool {
        let Some(party) = self.require_leader(local_user_id, party_id, "kick_member") else {
            return false;
        };
        if target_member_id == local_user_id || !party.is_member(target_member_id) {
            warn!(
                user = %local_user_id, %party_id, target = %target_member_id,
                "Rejecting kick_member (RemoteMemberNotMember)"
            );
            return false;
        }

        party.with_members_mut(|members| members.remove(target_member_id));

        let mut result = KickMemberCompletionResult::Succeeded;
        if let Err(error) = self.deps.transport.push(
            local_user_id,
            target_member_id,
            PartyPush::Kicked {
                party_id: party_id.clone(),
            },
        ) {
            warn!(
                user = %local_user_id, %party_id, target = %target_member_id, %error,
                "Failed to deliver kick notice"
            );
            result = KickMemberCompletionResult::MessagingFailure;
        }

        self.broadcast(
            local_user_id,
            &party,
            &[target_member_id],
            PartyPush::MemberExited {
                party_id: party_id.clone(),
                member_id: target_member_id.clone(),
                reason: MemberExitedReason::Kicked,
            },
        );

        self.dispatch(ClientEvent::PartyMemberExited {
            local_user_id: local_user_id.clone(),
            party_id: party_id.clone(),
            member_id: target_member_id.clone(),
            reason: MemberExitedReason::Kicked,
        });
        callback(local_user_id, party_id, target_member_id, result);
        true
    }

    fn promote_member(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        target_member_id: &UserId,
        callback: PromoteMemberCallback,
    ) -> bool {
        let Some(party) = self.require_leader(local_user_id, party_id, "promote_member") else {
            return false;
        };
        if party.promotion_lockout() {
            warn!(
                user = %local_user_id, %party_id,
                "Rejecting promote_member (PromotionAlreadyPending)"
            );
            return false;
        }
        if target_member_id == local_user_id {
            warn!(user = %local_user_id, %party_id, "Rejecting promote_member (TargetIsSelf)");
            return false;
        }
        if !party.is_member(target_member_id) {
            warn!(
                user = %local_user_id, %party_id, target = %target_member_id,
                "Rejecting promote_member (TargetNotMember)"
            );
            return false;
        }

        // The leader id changes before any dependent permission check can
        // run again.
        party.set_leader(target_member_id.clone());

        let all_delivered = self.broadcast(
            local_user_id,
            &party,
            &[],
            PartyPush::MemberPromoted {
                party_id: party_id.clone(),
                member_id: target_member_id.clone(),
            },
        );
        let result = if all_delivered {
            PromoteMemberCompletionResult::Succeeded
        } else {
            PromoteMemberCompletionResult::MessagingFailure
        };

        // Authority moved; the new leader re-advertises when the promotion
        // push reaches them.
        self.deps
            .presence_service
            .withdraw_advertisement(local_user_id, party_id);

        self.dispatch(ClientEvent::PartyMemberChanged {
            local_user_id: local_user_id.clone(),
            party_id: party_id.clone(),
            member_id: target_member_id.clone(),
            reason: MemberChangedReason::Promoted,
        });
        callback(local_user_id, party_id, target_member_id, result);
        true
    }

    fn update_party_data(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        data: PartyData,
    ) -> bool {
        let Some(party) = self.deps.parties_repo.get(local_user_id, party_id) else {
            warn!(user = %local_user_id, %party_id, "Rejecting update_party_data. Unknown party");
            return false;
        };
        if !party.is_member(local_user_id) {
            warn!(user = %local_user_id, %party_id, "Rejecting update_party_data. Not a member");
            return false;
        }

        party.set_party_data(data.clone());
        self.broadcast(
            local_user_id,
            &party,
            &[],
            PartyPush::PartyDataChanged {
                party_id: party_id.clone(),
                data: data.clone(),
            },
        );
        self.dispatch(ClientEvent::PartyDataReceived {
            local_user_id: local_user_id.clone(),
            party_id: party_id.clone(),
            data,
        });
        true
    }

    fn update_party_member_data(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        data: PartyData,
    ) -> bool {
        let Some(party) = self.deps.parties_repo.get(local_user_id, party_id) else {
            warn!(
                user = %local_user_id, %party_id,
                "Rejecting update_party_member_data. Unknown party"
            );
            return false;
        };
        if !party.with_members_mut(|members| members.set_data(local_user_id, data.clone())) {
            warn!(
                user = %local_user_id, %party_id,
                "Rejecting update_party_member_data. Not a member"
            );
            return false;
        }

        self.broadcast(
            local_user_id,
            &party,
            &[],
            PartyPush::MemberDataChanged {
                party_id: party_id.clone(),
                member_id: local_user_id.clone(),
                data: data.clone(),
            },
        );
        self.dispatch(ClientEvent::PartyMemberDataReceived {
            local_user_id: local_user_id.clone(),
            party_id: party_id.clone(),
            member_id: local_user_id.clone(),
            data,
        });
        true
    }

    fn make_join_info(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
    ) -> Option<PartyJoinInfo> {
        let party = self.deps.parties_repo.get(local_user_id, party_id)?;
        // Sharing the join info shares what the key grants.
        Some(self.join_info_for_party(local_user_id, &party, true))
    }

    fn handle_response(
        &self,
        local_user_id: &UserId,
        request_id: &RequestId,
        response: PartyResponse,
    ) {
        let Some(operation) = self.deps.pending_ops_repo.take(request_id) else {
            warn!(
                user = %local_user_id, %request_id,
                "Discarding response for unknown or already-resolved request"
            );
            return;
        };

        match (operation, response) {
            (
                PendingOperation::Create {
                    local_user_id: user,
                    party_type_id,
                    config,
                    callback,
                },
                PartyResponse::Created {
                    party_id,
                    room_id,
                    access_key,
                },
            ) => {
                // The service response carries the allocated ids only; the
                // configuration the caller asked for applies verbatim.
                let party = Party::active(
                    party_id.clone(),
                    party_type_id,
                    self.deps.ctx.profile(&user),
                    config,
                    room_id,
                    Some(access_key),
                );
                if self.deps.parties_repo.set(&user, party.clone()).is_err() {
                    error!(user = %user, %party_id, "Created party already exists in cache");
                    callback(
                        &user,
                        None,
                        CreatePartyCompletionResult::UnknownInternalFailure,
                    );
                    return;
                }
                self.publish_presence(&user, &party);
                self.dispatch(ClientEvent::PartyJoined {
                    local_user_id: user.clone(),
                    party_id: party_id.clone(),
                });
                callback(
                    &user,
                    Some(&party_id),
                    CreatePartyCompletionResult::Succeeded,
                );
            }
            (
                PendingOperation::Update {
                    local_user_id: user,
                    party_id,
                    config,
                    callback,
                },
                PartyResponse::Updated { access_key },
            ) => {
                let Some(party) = self.deps.parties_repo.get(&user, &party_id) else {
                    callback(
                        &user,
                        &party_id,
                        UpdateConfigCompletionResult::UnknownParty,
                    );
                    return;
                };
                party.set_config(config.clone());
                if let Some(access_key) = &access_key {
                    party.set_access_key(Some(access_key.clone()));
                }
                self.broadcast(
                    &user,
                    &party,
                    &[],
                    PartyPush::ConfigChanged {
                        party_id: party_id.clone(),
                        config: config.clone(),
                        access_key,
                    },
                );
                self.publish_presence(&user, &party);
                self.dispatch(ClientEvent::PartyConfigChanged {
                    local_user_id: user.clone(),
                    party_id: party_id.clone(),
                    config,
                });
                callback(
                    &user,
                    &party_id,
                    UpdateConfigCompletionResult::Succeeded,
                );
            }
            (
                PendingOperation::Join {
                    local_user_id: user,
                    party_id,
                    callback,
                },
                PartyResponse::JoinApproved { snapshot },
            ) => {
                let Some(party) = self.deps.parties_repo.get(&user, &party_id) else {
                    callback(
                        &user,
                        &party_id,
                        JoinPartyCompletionResult::PartyNotInPendingState,
                        0,
                    );
                    return;
                };
                if party.state() != PartyState::JoinPending {
                    callback(
                        &user,
                        &party_id,
                        JoinPartyCompletionResult::PartyNotInPendingState,
                        0,
                    );
                    return;
                }
                Self::apply_snapshot(&party, snapshot);
                self.dispatch(ClientEvent::PartyJoined {
                    local_user_id: user.clone(),
                    party_id: party_id.clone(),
                });
                callback(&user, &party_id, JoinPartyCompletionResult::Succeeded, 0);
            }
            (
                PendingOperation::Join {
                    local_user_id: user,
                    party_id,
                    callback,
                },
                PartyResponse::JoinDenied {
                    result,
                    not_approved_reason,
                },
            ) => {
                self.deps.parties_repo.delete(&user, &party_id);
                callback(&user, &party_id, result, not_approved_reason);
            }
            (
                PendingOperation::Leave {
                    local_user_id: user,
                    party_id,
                    callback,
                },
                PartyResponse::LeaveAck,
            ) => {
                self.deps.parties_repo.delete(&user, &party_id);
                self.deps
                    .presence_service
                    .withdraw_advertisement(&user, &party_id);
                self.dispatch(ClientEvent::PartyExited {
                    local_user_id: user.clone(),
                    party_id: party_id.clone(),
                });
                callback(
                    &user,
                    &party_id,
                    LeavePartyCompletionResult::Succeeded,
                );
            }
            (
                PendingOperation::Rejoin {
                    local_user_id: user,
                    party_id,
                },
                PartyResponse::Rejoined { snapshot },
            ) => {
                let Some(party) = self.deps.parties_repo.get(&user, &party_id) else {
                    return;
                };
                let config = snapshot.config.clone();
                let data = snapshot.party_data.clone();
                Self::apply_snapshot(&party, snapshot);
                // State may have moved while we were away.
                self.dispatch(ClientEvent::PartyConfigChanged {
                    local_user_id: user.clone(),
                    party_id: party_id.clone(),
                    config,
                });
                self.dispatch(ClientEvent::PartyDataReceived {
                    local_user_id: user.clone(),
                    party_id: party_id.clone(),
                    data,
                });
            }
            (operation, PartyResponse::Error { message }) => {
                warn!(
                    user = %local_user_id, %request_id, %message,
                    "Request failed on the remote side"
                );
                if let PendingOperation::Rejoin {
                    local_user_id: user,
                    party_id,
                } = &operation
                {
                    let (user, party_id) = (user.clone(), party_id.clone());
                    self.cleanup_party(&user, &party_id, None);
                }
                operation.fail_internal();
            }
            (operation, response) => {
                error!(
                    user = %local_user_id, %request_id, ?response,
                    "Response does not match the pending operation"
                );
                operation.fail_internal();
            }
        }
    }

    fn handle_request_timed_out(&self, local_user_id: &UserId, request_id: &RequestId) {
        let Some(operation) = self.deps.pending_ops_repo.take(request_id) else {
            return;
        };
        info!(user = %local_user_id, %request_id, ?operation, "Request timed out");

        match &operation {
            PendingOperation::Join {
                local_user_id: user,
                party_id,
                ..
            } => {
                self.deps.parties_repo.delete(user, party_id);
            }
            PendingOperation::Leave {
                local_user_id: user,
                party_id,
                ..
            } => {
                if let Some(party) = self.deps.parties_repo.get(user, party_id) {
                    party.set_state(PartyState::Active);
                }
            }
            PendingOperation::Rejoin {
                local_user_id: user,
                party_id,
            } => {
                let (user, party_id) = (user.clone(), party_id.clone());
                self.cleanup_party(&user, &party_id, None);
            }
            PendingOperation::Create { .. } | PendingOperation::Update { .. } => {}
        }

        operation.time_out();
    }

    fn handle_request(
        &self,
        local_user_id: &UserId,
        request_id: &RequestId,
        sender: &UserId,
        request: PartyRequest,
    ) {
        match request {
            PartyRequest::Join {
                party_id,
                submission,
                ..
            } => self.handle_join_request(local_user_id, request_id, sender, &party_id, submission),
            PartyRequest::Rejoin { party_id } => {
                self.handle_rejoin_request(local_user_id, request_id, sender, &party_id)
            }
            PartyRequest::Leave { party_id } => {
                self.handle_leave_request(local_user_id, request_id, sender, &party_id)
            }
            PartyRequest::Create { .. } | PartyRequest::Update { .. } => {
                warn!(
                    user = %local_user_id, %request_id, sender = %sender,
                    "Discarding service-bound request routed to a client"
                );
            }
        }
    }

    fn handle_push(&self, local_user_id: &UserId, sender: &UserId, push: PartyPush) {
        match push {
            PartyPush::Invite { invite } => self.handle_invite_push(local_user_id, invite),
            PartyPush::InviteRequest {
                party_id,
                request_for,
            } => {
                self.dispatch(ClientEvent::PartyInviteRequestReceived {
                    local_user_id: local_user_id.clone(),
                    party_id,
                    sender_id: sender.clone(),
                    request_for_id: request_for.id,
                });
            }
            PartyPush::InviteResponse { party_id, response } => {
                if response != InvitationResponse::Accepted {
                    if let Some(party) = self.deps.parties_repo.get(local_user_id, &party_id) {
                        party.remove_invited_user(sender);
                    }
                }
                self.dispatch(ClientEvent::PartyInviteResponseReceived {
                    local_user_id: local_user_id.clone(),
                    party_id,
                    sender_id: sender.clone(),
                    response,
                });
            }
            PartyPush::MemberJoined { party_id, member } => {
                let Some(party) = self.get_party(local_user_id, &party_id, "MemberJoined") else {
                    return;
                };
                let member_id = member.user_id.clone();
                if party.with_members_mut(|members| members.add(member)) {
                    self.dispatch(ClientEvent::PartyMemberJoined {
                        local_user_id: local_user_id.clone(),
                        party_id,
                        member_id,
                    });
                }
            }
            PartyPush::MemberExited {
                party_id,
                member_id,
                reason,
            } => self.handle_member_exited_push(local_user_id, &party_id, &member_id, reason),
            PartyPush::MemberPromoted {
                party_id,
                member_id,
            } => {
                let Some(party) = self.get_party(local_user_id, &party_id, "MemberPromoted")
                else {
                    return;
                };
                if party.leader() == member_id {
                    return;
                }
                party.set_leader(member_id.clone());
                if &member_id == local_user_id {
                    self.publish_presence(local_user_id, &party);
                }
                self.dispatch(ClientEvent::PartyMemberChanged {
                    local_user_id: local_user_id.clone(),
                    party_id,
                    member_id,
                    reason: MemberChangedReason::Promoted,
                });
            }
            PartyPush::MemberDisconnected {
                party_id,
                member_id,
            } => self.handle_member_disconnected_push(local_user_id, &party_id, &member_id),
            PartyPush::MemberRejoined {
                party_id,
                member_id,
            } => {
                let Some(party) = self.get_party(local_user_id, &party_id, "MemberRejoined")
                else {
                    return;
                };
                if party.with_members_mut(|members| members.set_connected(&member_id, true)) {
                    self.dispatch(ClientEvent::PartyMemberChanged {
                        local_user_id: local_user_id.clone(),
                        party_id,
                        member_id,
                        reason: MemberChangedReason::Rejoined,
                    });
                }
            }
            PartyPush::ConfigChanged {
                party_id,
                config,
                access_key,
            } => {
                let Some(party) = self.get_party(local_user_id, &party_id, "ConfigChanged") else {
                    return;
                };
                party.set_config(config.clone());
                if let Some(access_key) = access_key {
                    party.set_access_key(Some(access_key));
                }
                self.dispatch(ClientEvent::PartyConfigChanged {
                    local_user_id: local_user_id.clone(),
                    party_id,
                    config,
                });
            }
            PartyPush::PartyDataChanged { party_id, data } => {
                let Some(party) = self.get_party(local_user_id, &party_id, "PartyDataChanged")
                else {
                    return;
                };
                party.set_party_data(data.clone());
                self.dispatch(ClientEvent::PartyDataReceived {
                    local_user_id: local_user_id.clone(),
                    party_id,
                    data,
                });
            }
            PartyPush::MemberDataChanged {
                party_id,
                member_id,
                data,
            } => {
                let Some(party) = self.get_party(local_user_id, &party_id, "MemberDataChanged")
                else {
                    return;
                };
                if party.with_members_mut(|members| members.set_data(&member_id, data.clone())) {
                    self.dispatch(ClientEvent::PartyMemberDataReceived {
                        local_user_id: local_user_id.clone(),
                        party_id,
                        member_id,
                        data,
                    });
                }
            }
            PartyPush::Kicked { party_id } => {
                self.cleanup_party(local_user_id, &party_id, Some(MemberExitedReason::Kicked));
            }
            PartyPush::JoinRequestResponse {
                party_id,
                member_id,
                was_accepted,
            } => {
                self.dispatch(ClientEvent::PartyJoinRequestResponseReceived {
                    local_user_id: local_user_id.clone(),
                    party_id,
                    member_id,
                    was_accepted,
                });
            }
        }
    }

    fn handle_connection_status_changed(&self, local_user_id: &UserId, connected: bool) {
        if !connected {
            for party in self.deps.parties_repo.get_all(local_user_id) {
                if party.config().should_remove_on_disconnection {
                    let party_id = party.party_id.clone();
                    self.cleanup_party(local_user_id, &party_id, None);
                } else if party.state() == PartyState::Active {
                    party.set_state(PartyState::Disconnected);
                }
            }
            return;
        }

        for party in self.deps.parties_repo.get_all(local_user_id) {
            if party.state() != PartyState::Disconnected {
                continue;
            }
            if party.is_leader(local_user_id) {
                party.set_state(PartyState::Active);
                continue;
            }

            party.set_state(PartyState::Reconnecting);
            let request_id = self.new_request_id();
            self.deps.pending_ops_repo.insert(
                request_id.clone(),
                PendingOperation::Rejoin {
                    local_user_id: local_user_id.clone(),
                    party_id: party.party_id.clone(),
                },
            );
            let request = PartyRequest::Rejoin {
                party_id: party.party_id.clone(),
            };
            if !self.send_or_fail(
                local_user_id,
                &Recipient::User(party.leader()),
                &request_id,
                request,
            ) {
                let party_id = party.party_id.clone();
                self.cleanup_party(local_user_id, &party_id, None);
            }
        }
    }

    fn dump_party_state(&self, local_user_id: &UserId) {
        let parties = self.deps.parties_repo.get_all(local_user_id);
        info!(user = %local_user_id, count = parties.len(), "Dumping party state");
        for party in parties {
            let members = party.with_members(|members| {
                members.ids().map(ToString::to_string).join(", ")
            });
            info!(
                party = %party.party_id,
                party_type = %party.party_type_id,
                state = %party.state(),
                leader = %party.leader(),
                members,
                config = ?party.config(),
                "Party"
            );
        }
    }
}

impl PartiesDomainService {
    fn new_request_id(&self) -> RequestId {
        RequestId::from(self.deps.id_provider.new_id())
    }

    fn dispatch(&self, event: ClientEvent) {
        self.deps.client_event_dispatcher.dispatch_event(event)
    }

    fn get_party(&self, local_user_id: &UserId, party_id: &PartyId, context: &str) -> Option<Party> {
        let party = self.deps.parties_repo.get(local_user_id, party_id);
        if party.is_none() {
            warn!(user = %local_user_id, %party_id, context, "Discarding event for unknown party");
        }
        party
    }

    /// Looks up a party and verifies the local user leads it. Logs and
    /// returns `None` otherwise.
    fn require_leader(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        operation: &str,
    ) -> Option<Party> {
        if !self.deps.ctx.is_local_user(local_user_id) {
            warn!(user = %local_user_id, operation, "Rejecting operation. User is not logged in");
            return None;
        }
        let Some(party) = self.deps.parties_repo.get(local_user_id, party_id) else {
            warn!(user = %local_user_id, %party_id, operation, "Rejecting operation (UnknownParty)");
            return None;
        };
        if !party.is_member(local_user_id) {
            warn!(
                user = %local_user_id, %party_id, operation,
                "Rejecting operation (LocalMemberNotMember)"
            );
            return None;
        }
        if !party.is_leader(local_user_id) {
            warn!(
                user = %local_user_id, %party_id, operation,
                "Rejecting operation (LocalMemberNotLeader)"
            );
            return None;
        }
        Some(party)
    }

    /// Sends a request, resolving the pending operation with a messaging
    /// failure when the transport rejects it outright. Returns `false` in
    /// that case. The operation may already be resolved by the time this
    /// returns, transports are allowed to answer synchronously.
    fn send_or_fail(
        &self,
        local_user_id: &UserId,
        recipient: &Recipient,
        request_id: &RequestId,
        request: PartyRequest,
    ) -> bool {
        let Err(error) =
            self.deps
                .transport
                .send_request(local_user_id, recipient, request_id, request)
        else {
            return true;
        };
        warn!(user = %local_user_id, %request_id, %error, "Failed to dispatch request");
        if let Some(operation) = self.deps.pending_ops_repo.take(request_id) {
            operation.messaging_failure();
        }
        false
    }

    fn respond(
        &self,
        local_user_id: &UserId,
        recipient: &UserId,
        request_id: &RequestId,
        response: PartyResponse,
    ) {
        if let Err(error) =
            self.deps
                .transport
                .respond(local_user_id, recipient, request_id, response)
        {
            warn!(
                user = %local_user_id, %request_id, recipient = %recipient, %error,
                "Failed to deliver response"
            );
        }
    }

    /// Pushes to every member except the sender and `exclude`. Returns
    /// `true` if all deliveries were accepted by the transport.
    fn broadcast(
        &self,
        local_user_id: &UserId,
        party: &Party,
        exclude: &[&UserId],
        push: PartyPush,
    ) -> bool {
        let recipients = party.with_members(|members| {
            members
                .ids()
                .filter(|id| *id != local_user_id && !exclude.contains(id))
                .cloned()
                .collect::<Vec<_>>()
        });

        let mut all_delivered = true;
        for recipient in recipients {
            if let Err(error) = self
                .deps
                .transport
                .push(local_user_id, &recipient, push.clone())
            {
                warn!(
                    user = %local_user_id, recipient = %recipient, %error,
                    "Failed to deliver push"
                );
                all_delivered = false;
            }
        }
        all_delivered
    }

    fn join_info_for_party(
        &self,
        local_user_id: &UserId,
        party: &Party,
        include_key: bool,
    ) -> PartyJoinInfo {
        let leader_id = party.leader();
        let leader_profile = party
            .with_members(|members| members.get(&leader_id).map(PartyMember::profile))
            .unwrap_or_else(|| self.deps.ctx.profile(&leader_id));
        let config = party.config();

        PartyJoinInfo::new(
            party.party_id.clone(),
            party.party_type_id,
            leader_profile,
            self.deps.ctx.profile(local_user_id),
        )
        .with_key(include_key.then(|| party.access_key()).flatten())
        .with_password(config.has_password())
        .with_accepting_members(
            config.is_accepting_members,
            config.not_accepting_members_reason,
        )
        .with_app_info(
            self.deps.ctx.client_info.app_id.clone(),
            self.deps.ctx.client_info.build_id.clone(),
        )
    }

    /// Publishes or withdraws the party's presence advertisement according
    /// to its presence permissions. Only meaningful for the leader.
    fn publish_presence(&self, local_user_id: &UserId, party: &Party) {
        let permissions = party.config().presence_permissions;
        if !permissions.publishes_id() {
            self.deps
                .presence_service
                .withdraw_advertisement(local_user_id, &party.party_id);
            return;
        }
        let advertisement =
            self.join_info_for_party(local_user_id, party, permissions.publishes_key());
        self.deps
            .presence_service
            .publish_advertisement(local_user_id, advertisement);
    }

    fn resolve_invitation(
        &self,
        local_user_id: &UserId,
        sender_id: &UserId,
        response: InvitationResponse,
    ) -> bool {
        if !self.deps.ctx.is_local_user(local_user_id) {
            warn!(user = %local_user_id, "Rejecting invitation response (NotLoggedIn)");
            return false;
        }
        let Some(invite) = self.deps.invites_repo.remove(local_user_id, sender_id) else {
            warn!(
                user = %local_user_id, sender = %sender_id,
                "Rejecting invitation response. No pending invite from this user"
            );
            return false;
        };

        let push = PartyPush::InviteResponse {
            party_id: invite.join_info.party_id().clone(),
            response,
        };
        if let Err(error) = self.deps.transport.push(local_user_id, sender_id, push) {
            warn!(
                user = %local_user_id, sender = %sender_id, %error,
                "Failed to deliver invitation response"
            );
        }

        self.dispatch(ClientEvent::PartyInvitesChanged {
            local_user_id: local_user_id.clone(),
        });
        true
    }

    fn handle_invite_push(&self, local_user_id: &UserId, invite: PartyInvite) {
        let party_id = invite.join_info.party_id().clone();
        let sender_id = invite.sender.id.clone();

        // Pushes are at-least-once; a redelivered invite must not notify
        // twice.
        if !self.deps.invites_repo.insert(local_user_id, invite) {
            return;
        }

        self.dispatch(ClientEvent::PartyInviteReceived {
            local_user_id: local_user_id.clone(),
            party_id,
            sender_id,
        });
        self.dispatch(ClientEvent::PartyInvitesChanged {
            local_user_id: local_user_id.clone(),
        });
    }

    fn handle_join_request(
        &self,
        local_user_id: &UserId,
        request_id: &RequestId,
        sender: &UserId,
        party_id: &PartyId,
        submission: JoinSubmission,
    ) {
        let joiner_id = submission.joiner.id.clone();
        if &joiner_id != sender {
            warn!(
                user = %local_user_id, sender = %sender, joiner = %joiner_id,
                "Discarding join request whose sender does not match its submission"
            );
            return;
        }

        let Some(party) = self.deps.parties_repo.get(local_user_id, party_id) else {
            self.respond(
                local_user_id,
                sender,
                request_id,
                PartyResponse::JoinDenied {
                    result: JoinPartyCompletionResult::RequesteeNotMember,
                    not_approved_reason: 0,
                },
            );
            return;
        };
        if !party.is_leader(local_user_id) {
            self.respond(
                local_user_id,
                sender,
                request_id,
                PartyResponse::JoinDenied {
                    result: JoinPartyCompletionResult::RequesteeNotLeader,
                    not_approved_reason: 0,
                },
            );
            return;
        }

        // Redelivered request from someone we already admitted.
        if party.is_member(&joiner_id) {
            let snapshot = self.snapshot(&party);
            self.respond(
                local_user_id,
                sender,
                request_id,
                PartyResponse::JoinApproved { snapshot },
            );
            return;
        }

        if submission.build_id != self.deps.ctx.client_info.build_id {
            self.respond(
                local_user_id,
                sender,
                request_id,
                PartyResponse::JoinDenied {
                    result: JoinPartyCompletionResult::BadBuild,
                    not_approved_reason: 0,
                },
            );
            return;
        }

        let config = party.config();
        let was_invited = party.is_invited_user(&joiner_id);

        if !config.is_accepting_members && !was_invited {
            self.respond(
                local_user_id,
                sender,
                request_id,
                PartyResponse::JoinDenied {
                    result: JoinPartyCompletionResult::NotApproved,
                    not_approved_reason: config.not_accepting_members_reason,
                },
            );
            return;
        }
        if !config.has_space_for_member(party.member_count()) {
            self.respond(
                local_user_id,
                sender,
                request_id,
                PartyResponse::JoinDenied {
                    result: JoinPartyCompletionResult::NoSpace,
                    not_approved_reason: 0,
                },
            );
            return;
        }

        // An invitation stands in for key or password knowledge.
        if !was_invited {
            if let Some(access_key) = party.access_key() {
                let provided = submission.provided_key.as_deref();
                let key_matches = provided == Some(access_key.as_str());
                let password_matches =
                    config.has_password() && provided == Some(config.password.as_str());
                if !key_matches && !password_matches {
                    self.respond(
                        local_user_id,
                        sender,
                        request_id,
                        PartyResponse::JoinDenied {
                            result: JoinPartyCompletionResult::NotApproved,
                            not_approved_reason: 0,
                        },
                    );
                    return;
                }
            }
        }

        let request = PendingJoinRequest {
            request_id: request_id.clone(),
            submission,
        };

        match config.join_request_action {
            JoinRequestAction::AutoReject if !was_invited => {
                self.respond(
                    local_user_id,
                    sender,
                    request_id,
                    PartyResponse::JoinDenied {
                        result: JoinPartyCompletionResult::NotApproved,
                        not_approved_reason: config.not_accepting_members_reason,
                    },
                );
            }
            JoinRequestAction::Manual if !was_invited => {
                party.push_join_request(request);
                self.update_promotion_lockout(local_user_id, &party);
                self.dispatch(ClientEvent::PartyJoinRequestReceived {
                    local_user_id: local_user_id.clone(),
                    party_id: party_id.clone(),
                    sender_id: joiner_id,
                });
            }
            _ => {
                self.admit_member(local_user_id, &party, &request, false);
            }
        }
    }

    /// Admits a requester: updates membership, answers the join request and
    /// notifies everyone. `announce_decision` additionally raises the
    /// join-request-response notifications used by the manual approval flow.
    fn admit_member(
        &self,
        local_user_id: &UserId,
        party: &Party,
        request: &PendingJoinRequest,
        announce_decision: bool,
    ) {
        let joiner = request.sender().clone();
        let party_id = party.party_id.clone();

        if !party.config().has_space_for_member(party.member_count()) {
            self.respond(
                local_user_id,
                &joiner.id,
                &request.request_id,
                PartyResponse::JoinDenied {
                    result: JoinPartyCompletionResult::NoSpace,
                    not_approved_reason: 0,
                },
            );
            return;
        }

        let mut member = PartyMember::new(joiner.clone());
        member.data = request.submission.member_data.clone();
        let added = party.with_members_mut(|members| members.add(member.clone()));
        party.remove_invited_user(&joiner.id);

        if added {
            self.broadcast(
                local_user_id,
                party,
                &[&joiner.id],
                PartyPush::MemberJoined {
                    party_id: party_id.clone(),
                    member,
                },
            );
        }

        let snapshot = self.snapshot(party);
        self.respond(
            local_user_id,
            &joiner.id,
            &request.request_id,
            PartyResponse::JoinApproved { snapshot },
        );

        if announce_decision {
            self.announce_join_decision(local_user_id, party, &joiner.id, true);
        }
        if added {
            self.dispatch(ClientEvent::PartyMemberJoined {
                local_user_id: local_user_id.clone(),
                party_id,
                member_id: joiner.id,
            });
        }
    }

    fn announce_join_decision(
        &self,
        local_user_id: &UserId,
        party: &Party,
        requester_id: &UserId,
        was_accepted: bool,
    ) {
        self.broadcast(
            local_user_id,
            party,
            &[requester_id],
            PartyPush::JoinRequestResponse {
                party_id: party.party_id.clone(),
                member_id: requester_id.clone(),
                was_accepted,
            },
        );
        self.dispatch(ClientEvent::PartyJoinRequestResponseReceived {
            local_user_id: local_user_id.clone(),
            party_id: party.party_id.clone(),
            member_id: requester_id.clone(),
            was_accepted,
        });
    }

    fn handle_rejoin_request(
        &self,
        local_user_id: &UserId,
        request_id: &RequestId,
        sender: &UserId,
        party_id: &PartyId,
    ) {
        let Some(party) = self.deps.parties_repo.get(local_user_id, party_id) else {
            self.respond(
                local_user_id,
                sender,
                request_id,
                PartyResponse::Error {
                    message: "Unknown party".to_string(),
                },
            );
            return;
        };
        if !party.is_leader(local_user_id) || !party.is_member(sender) {
            self.respond(
                local_user_id,
                sender,
                request_id,
                PartyResponse::Error {
                    message: "Cannot rejoin this party".to_string(),
                },
            );
            return;
        }

        if party.with_members_mut(|members| members.set_connected(sender, true)) {
            self.broadcast(
                local_user_id,
                &party,
                &[sender],
                PartyPush::MemberRejoined {
                    party_id: party_id.clone(),
                    member_id: sender.clone(),
                },
            );
            self.dispatch(ClientEvent::PartyMemberChanged {
                local_user_id: local_user_id.clone(),
                party_id: party_id.clone(),
                member_id: sender.clone(),
                reason: MemberChangedReason::Rejoined,
            });
        }

        let snapshot = self.snapshot(&party);
        self.respond(
            local_user_id,
            sender,
            request_id,
            PartyResponse::Rejoined { snapshot },
        );
    }

    fn handle_leave_request(
        &self,
        local_user_id: &UserId,
        request_id: &RequestId,
        sender: &UserId,
        party_id: &PartyId,
    ) {
        let Some(party) = self.deps.parties_repo.get(local_user_id, party_id) else {
            self.respond(local_user_id, sender, request_id, PartyResponse::LeaveAck);
            return;
        };
        if !party.is_leader(local_user_id) {
            self.respond(
                local_user_id,
                sender,
                request_id,
                PartyResponse::Error {
                    message: "Not the party leader".to_string(),
                },
            );
            return;
        }

        let removed = party
            .with_members_mut(|members| members.remove(sender))
            .is_some();
        // Ack even for non-members so a redelivered leave converges.
        self.respond(local_user_id, sender, request_id, PartyResponse::LeaveAck);

        if !removed {
            return;
        }
        self.broadcast(
            local_user_id,
            &party,
            &[sender],
            PartyPush::MemberExited {
                party_id: party_id.clone(),
                member_id: sender.clone(),
                reason: MemberExitedReason::Left,
            },
        );
        self.dispatch(ClientEvent::PartyMemberExited {
            local_user_id: local_user_id.clone(),
            party_id: party_id.clone(),
            member_id: sender.clone(),
            reason: MemberExitedReason::Left,
        });
    }

    fn leave_as_leader(
        &self,
        local_user_id: &UserId,
        party: &Party,
        callback: LeavePartyCallback,
    ) {
        let party_id = party.party_id.clone();
        party.set_state(PartyState::LeavePending);

        // Parked join requests would otherwise dangle until they time out.
        for request in party.take_all_join_requests() {
            self.respond(
                local_user_id,
                &request.sender().id.clone(),
                &request.request_id,
                PartyResponse::JoinDenied {
                    result: JoinPartyCompletionResult::NotApproved,
                    not_approved_reason: 0,
                },
            );
        }

        let successor = party.with_members(|members| {
            members
                .ids()
                .filter(|id| *id != local_user_id)
                .min()
                .cloned()
        });

        if let Some(successor) = successor {
            // Hand over authority before announcing our own exit.
            party.set_leader(successor.clone());
            self.broadcast(
                local_user_id,
                party,
                &[],
                PartyPush::MemberPromoted {
                    party_id: party_id.clone(),
                    member_id: successor,
                },
            );
            self.broadcast(
                local_user_id,
                party,
                &[],
                PartyPush::MemberExited {
                    party_id: party_id.clone(),
                    member_id: local_user_id.clone(),
                    reason: MemberExitedReason::Left,
                },
            );
        }

        for operation in self
            .deps
            .pending_ops_repo
            .take_for_party(local_user_id, &party_id)
        {
            operation.fail();
        }
        self.deps.parties_repo.delete(local_user_id, &party_id);
        self.deps
            .presence_service
            .withdraw_advertisement(local_user_id, &party_id);
        self.dispatch(ClientEvent::PartyExited {
            local_user_id: local_user_id.clone(),
            party_id: party_id.clone(),
        });
        callback(
            local_user_id,
            &party_id,
            LeavePartyCompletionResult::Succeeded,
        );
    }

    fn handle_member_exited_push(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        member_id: &UserId,
        reason: MemberExitedReason,
    ) {
        if member_id == local_user_id {
            self.cleanup_party(local_user_id, party_id, Some(reason));
            return;
        }

        let Some(party) = self.get_party(local_user_id, party_id, "MemberExited") else {
            return;
        };
        if party
            .with_members_mut(|members| members.remove(member_id))
            .is_none()
        {
            return;
        }

        // The promotion push normally arrives first; this is the fallback
        // for a leader that vanished without handing over.
        if party.leader() == *member_id {
            let successor = party.with_members(|members| members.ids().min().cloned());
            if let Some(successor) = successor {
                party.set_leader(successor.clone());
                if &successor == local_user_id {
                    self.publish_presence(local_user_id, &party);
                }
                self.dispatch(ClientEvent::PartyMemberChanged {
                    local_user_id: local_user_id.clone(),
                    party_id: party_id.clone(),
                    member_id: successor,
                    reason: MemberChangedReason::Promoted,
                });
            }
        }

        self.dispatch(ClientEvent::PartyMemberExited {
            local_user_id: local_user_id.clone(),
            party_id: party_id.clone(),
            member_id: member_id.clone(),
            reason,
        });
    }

    fn handle_member_disconnected_push(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        member_id: &UserId,
    ) {
        let Some(party) = self.get_party(local_user_id, party_id, "MemberDisconnected") else {
            return;
        };
        if !party.is_member(member_id) {
            return;
        }

        if party.config().should_remove_on_disconnection {
            self.handle_member_exited_push(
                local_user_id,
                party_id,
                member_id,
                MemberExitedReason::Removed,
            );
            return;
        }

        if party.with_members_mut(|members| members.set_connected(member_id, false)) {
            self.dispatch(ClientEvent::PartyMemberChanged {
                local_user_id: local_user_id.clone(),
                party_id: party_id.clone(),
                member_id: member_id.clone(),
                reason: MemberChangedReason::Disconnected,
            });
        }
    }

    /// Removes a party from the cache, resolving every pending operation it
    /// owns with a failure, and raises the exit notifications.
    fn cleanup_party(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        exited_reason: Option<MemberExitedReason>,
    ) {
        for operation in self
            .deps
            .pending_ops_repo
            .take_for_party(local_user_id, party_id)
        {
            operation.fail();
        }

        let Some(party) = self.deps.parties_repo.delete(local_user_id, party_id) else {
            return;
        };
        party.set_state(PartyState::CleanUp);
        self.deps
            .presence_service
            .withdraw_advertisement(local_user_id, party_id);

        if let Some(reason) = exited_reason {
            self.dispatch(ClientEvent::PartyMemberExited {
                local_user_id: local_user_id.clone(),
                party_id: party_id.clone(),
                member_id: local_user_id.clone(),
                reason,
            });
        }
        self.dispatch(ClientEvent::PartyExited {
            local_user_id: local_user_id.clone(),
            party_id: party_id.clone(),
        });
    }

    fn update_promotion_lockout(&self, local_user_id: &UserId, party: &Party) {
        let lockout = party.has_pending_join_requests();
        if party.set_promotion_lockout(lockout) {
            self.dispatch(ClientEvent::PartyPromotionLockoutChanged {
                local_user_id: local_user_id.clone(),
                party_id: party.party_id.clone(),
                lockout,
            });
        }
    }

    fn snapshot(&self, party: &Party) -> PartySnapshot {
        PartySnapshot {
            party_id: party.party_id.clone(),
            party_type_id: party.party_type_id,
            leader: party.leader(),
            config: party.config(),
            room_id: party.room_id(),
            access_key: party.access_key(),
            members: party.with_members(MemberList::to_vec),
            party_data: party.party_data(),
        }
    }

    fn apply_snapshot(party: &Party, snapshot: PartySnapshot) {
        party.set_leader(snapshot.leader);
        party.set_config(snapshot.config);
        party.set_room_id(snapshot.room_id);
        party.set_access_key(snapshot.access_key);
        party.with_members_mut(|members| *members = MemberList::from_iter(snapshot.members));
        party.set_party_data(snapshot.party_data);
        party.set_state(PartyState::Active);
    }
}
