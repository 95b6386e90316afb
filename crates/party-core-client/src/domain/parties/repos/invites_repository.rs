// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use crate::domain::parties::models::PartyInvite;
use crate::domain::shared::models::{PartyId, UserId};

/// The pending party invitations of each local user, keyed by the inviter.
#[cfg_attr(feature = "test", mockall::automock)]
pub trait InvitesRepository: Send + Sync {
    fn get_all(&self, local_user_id: &UserId) -> Vec<PartyInvite>;

    fn get(&self, local_user_id: &UserId, sender_id: &UserId) -> Option<PartyInvite>;

    /// Stores an invite. Returns `false` if an identical invite (same sender,
    /// same party) was already pending, so that redelivered pushes don't
    /// produce duplicate notifications.
    fn insert(&self, local_user_id: &UserId, invite: PartyInvite) -> bool;

    fn remove(&self, local_user_id: &UserId, sender_id: &UserId) -> Option<PartyInvite>;

    /// Drops every invite referring to `party_id` and returns them.
    fn remove_for_party(&self, local_user_id: &UserId, party_id: &PartyId) -> Vec<PartyInvite>;
}
