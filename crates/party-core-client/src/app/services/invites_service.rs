// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use crate::app::deps::{DynInvitesRepository, DynPartiesDomainService};
use crate::domain::parties::models::{
    PartyData, PartyInvite, RequestPartyInvitationCompletionResult,
    SendPartyInvitationCompletionResult,
};
use crate::domain::shared::models::{PartyId, UserId};

/// Invitation flow: sending, requesting, answering and listing invites.
pub struct InvitesService {
    pub(crate) invites_repo: DynInvitesRepository,
    pub(crate) parties_domain_service: DynPartiesDomainService,
}

impl InvitesService {
    /// Invites `recipient_id` into the party. The recipient observes
    /// `PartyInviteReceived` and `PartyInvitesChanged`.
    pub fn send_invitation(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
        recipient_id: &UserId,
        client_data: PartyData,
        callback: impl FnOnce(&UserId, &PartyId, &UserId, SendPartyInvitationCompletionResult)
            + Send
            + 'static,
    ) -> bool {
        self.parties_domain_service.send_invitation(
            local_user_id,
            party_id,
            recipient_id,
            client_data,
            Box::new(callback),
        )
    }

    /// Asks `sender_id`, who advertises the party, to send us an invite.
    pub fn request_invitation(
        &self,
        local_user_id: &UserId,
        sender_id: &UserId,
        party_id: &PartyId,
        callback: impl FnOnce(&UserId, &PartyId, RequestPartyInvitationCompletionResult)
            + Send
            + 'static,
    ) -> bool {
        self.parties_domain_service.request_invitation(
            local_user_id,
            sender_id,
            party_id,
            Box::new(callback),
        )
    }

    /// Accepts the pending invite from `sender_id`. This does not initiate a
    /// join; follow up with `PartiesService::join_party` using the invite's
    /// join info.
    pub fn accept_invitation(&self, local_user_id: &UserId, sender_id: &UserId) -> bool {
        self.parties_domain_service
            .accept_invitation(local_user_id, sender_id)
    }

    pub fn reject_invitation(&self, local_user_id: &UserId, sender_id: &UserId) -> bool {
        self.parties_domain_service
            .reject_invitation(local_user_id, sender_id)
    }

    /// The local user's pending invitations.
    pub fn pending_invites(&self, local_user_id: &UserId) -> Vec<PartyInvite> {
        self.invites_repo.get_all(local_user_id)
    }
}
