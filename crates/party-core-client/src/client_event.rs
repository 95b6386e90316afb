// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use crate::domain::parties::models::{
    InvitationResponse, MemberChangedReason, MemberExitedReason, PartyConfiguration, PartyData,
};
use crate::domain::shared::models::{PartyId, UserId};

/// Notifications the coordinator multicasts to subscribers. Every event
/// names the local user it concerns; a process may drive several local
/// users through one client.
///
/// Delivery is fire-and-forget. Ordering is FIFO per event kind and party,
/// but not across distinct kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// The local user entered a party, by creating or joining it.
    PartyJoined { local_user_id: UserId, party_id: PartyId },

    /// The local user is no longer in the party.
    PartyExited { local_user_id: UserId, party_id: PartyId },

    /// Member promotion is temporarily locked out, or unlocked again.
    PartyPromotionLockoutChanged {
        local_user_id: UserId,
        party_id: PartyId,
        lockout: bool,
    },

    /// The party's configuration was replaced.
    PartyConfigChanged {
        local_user_id: UserId,
        party_id: PartyId,
        config: PartyConfiguration,
    },

    /// The party-wide data blob was replaced.
    PartyDataReceived {
        local_user_id: UserId,
        party_id: PartyId,
        data: PartyData,
    },

    /// A member disconnected, rejoined or was promoted.
    PartyMemberChanged {
        local_user_id: UserId,
        party_id: PartyId,
        member_id: UserId,
        reason: MemberChangedReason,
    },

    /// A member left, was removed or was kicked.
    PartyMemberExited {
        local_user_id: UserId,
        party_id: PartyId,
        member_id: UserId,
        reason: MemberExitedReason,
    },

    PartyMemberJoined {
        local_user_id: UserId,
        party_id: PartyId,
        member_id: UserId,
    },

    /// A member's data blob was replaced.
    PartyMemberDataReceived {
        local_user_id: UserId,
        party_id: PartyId,
        member_id: UserId,
        data: PartyData,
    },

    /// The local user's pending-invites list changed.
    PartyInvitesChanged { local_user_id: UserId },

    /// Someone asked to be invited to a party the local user can invite to.
    PartyInviteRequestReceived {
        local_user_id: UserId,
        party_id: PartyId,
        sender_id: UserId,
        request_for_id: UserId,
    },

    PartyInviteReceived {
        local_user_id: UserId,
        party_id: PartyId,
        sender_id: UserId,
    },

    /// A recipient answered an invitation the local user sent.
    PartyInviteResponseReceived {
        local_user_id: UserId,
        party_id: PartyId,
        sender_id: UserId,
        response: InvitationResponse,
    },

    /// A join request awaits the local user's (the leader's) decision.
    PartyJoinRequestReceived {
        local_user_id: UserId,
        party_id: PartyId,
        sender_id: UserId,
    },

    PartyJoinRequestResponseReceived {
        local_user_id: UserId,
        party_id: PartyId,
        member_id: UserId,
        was_accepted: bool,
    },
}
