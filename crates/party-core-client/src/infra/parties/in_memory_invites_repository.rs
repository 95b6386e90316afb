// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::domain::parties::models::PartyInvite;
use crate::domain::parties::repos::InvitesRepository;
use crate::domain::shared::models::{PartyId, UserId};

#[derive(Default)]
pub struct InMemoryInvitesRepository {
    invites: RwLock<HashMap<UserId, Vec<PartyInvite>>>,
}

impl InMemoryInvitesRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InvitesRepository for InMemoryInvitesRepository {
    fn get_all(&self, local_user_id: &UserId) -> Vec<PartyInvite> {
        self.invites
            .read()
            .get(local_user_id)
            .cloned()
            .unwrap_or_default()
    }

    fn get(&self, local_user_id: &UserId, sender_id: &UserId) -> Option<PartyInvite> {
        self.invites
            .read()
            .get(local_user_id)?
            .iter()
            .find(|invite| invite.sender.id == *sender_id)
            .cloned()
    }

    fn insert(&self, local_user_id: &UserId, invite: PartyInvite) -> bool {
        let mut invites = self.invites.write();
        let user_invites = invites.entry(local_user_id.clone()).or_default();
        if user_invites.iter().any(|existing| {
            existing.sender.id == invite.sender.id
                && existing.join_info.party_id() == invite.join_info.party_id()
        }) {
            return false;
        }
        user_invites.push(invite);
        true
    }

    fn remove(&self, local_user_id: &UserId, sender_id: &UserId) -> Option<PartyInvite> {
        let mut invites = self.invites.write();
        let user_invites = invites.get_mut(local_user_id)?;
        let index = user_invites
            .iter()
            .position(|invite| invite.sender.id == *sender_id)?;
        Some(user_invites.remove(index))
    }

    fn remove_for_party(&self, local_user_id: &UserId, party_id: &PartyId) -> Vec<PartyInvite> {
        let mut invites = self.invites.write();
        let Some(user_invites) = invites.get_mut(local_user_id) else {
            return Vec::new();
        };
        let (removed, kept): (Vec<_>, Vec<_>) = user_invites
            .drain(..)
            .partition(|invite| invite.join_info.party_id() == party_id);
        *user_invites = kept;
        removed
    }
}
