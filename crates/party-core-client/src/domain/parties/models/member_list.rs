// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::shared::models::{UserId, UserProfile};

use super::PartyData;

/// A member of a party together with the last data blob they broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyMember {
    pub user_id: UserId,
    pub display_name: String,
    pub is_connected: bool,
    pub data: PartyData,
}

impl PartyMember {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            user_id: profile.id,
            display_name: profile.display_name,
            is_connected: true,
            data: PartyData::new(),
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile::new(self.user_id.clone(), self.display_name.clone())
    }
}

/// The members of a single party, keyed by user id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberList {
    members: IndexMap<UserId, PartyMember>,
}

impl MemberList {
    /// Adds a member if they aren't in the list yet. Returns `false` for a
    /// duplicate, which callers treat as an already-applied change.
    pub fn add(&mut self, member: PartyMember) -> bool {
        if self.members.contains_key(&member.user_id) {
            return false;
        }
        self.members.insert(member.user_id.clone(), member);
        true
    }

    pub fn remove(&mut self, user_id: &UserId) -> Option<PartyMember> {
        self.members.shift_remove(user_id)
    }

    pub fn get(&self, user_id: &UserId) -> Option<&PartyMember> {
        self.members.get(user_id)
    }

    pub fn contains(&self, user_id: &UserId) -> bool {
        self.members.contains_key(user_id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &UserId> {
        self.members.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PartyMember> {
        self.members.values()
    }

    pub fn to_vec(&self) -> Vec<PartyMember> {
        self.members.values().cloned().collect()
    }

    /// Flips the member's connection flag. Returns `true` if it changed.
    pub fn set_connected(&mut self, user_id: &UserId, is_connected: bool) -> bool {
        let Some(member) = self.members.get_mut(user_id) else {
            return false;
        };
        if member.is_connected == is_connected {
            return false;
        }
        member.is_connected = is_connected;
        true
    }

    /// Replaces the member's data blob. Does nothing if the member is gone.
    pub fn set_data(&mut self, user_id: &UserId, data: PartyData) -> bool {
        let Some(member) = self.members.get_mut(user_id) else {
            return false;
        };
        member.data = data;
        true
    }
}

impl FromIterator<PartyMember> for MemberList {
    fn from_iter<T: IntoIterator<Item = PartyMember>>(iter: T) -> Self {
        Self {
            members: iter
                .into_iter()
                .map(|member| (member.user_id.clone(), member))
                .collect(),
        }
    }
}
