// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::{PartyData, PresencePermissions};

/// How a party treats incoming join requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum JoinRequestAction {
    /// The leader decides each request via `approve_join_request`.
    #[default]
    Manual,
    AutoApprove,
    AutoReject,
}

/// Who may send invitations for a party.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum InvitePermissions {
    /// Available to the leader only.
    #[default]
    Leader,
    /// Available to friends of the leader only.
    Friends,
    /// Available to anyone.
    Anyone,
}

/// Party policy snapshot. Updating a party replaces this object wholesale,
/// there is no field-level update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyConfiguration {
    pub join_request_action: JoinRequestAction,
    pub presence_permissions: PresencePermissions,
    pub invite_permissions: InvitePermissions,
    pub should_remove_on_disconnection: bool,
    pub is_accepting_members: bool,
    /// Client-defined code explaining why members are not being accepted.
    pub not_accepting_members_reason: i32,
    /// Maximum active members. 0 means no maximum.
    pub max_members: u32,
    /// Human readable nickname.
    pub nickname: String,
    /// Human readable description.
    pub description: String,
    /// Human readable password for the party.
    pub password: String,
    /// Clients can attach whatever configuration data they want.
    pub client_config_data: PartyData,
}

impl Default for PartyConfiguration {
    fn default() -> Self {
        Self {
            join_request_action: JoinRequestAction::Manual,
            presence_permissions: PresencePermissions::PUBLIC,
            invite_permissions: InvitePermissions::Leader,
            should_remove_on_disconnection: false,
            is_accepting_members: false,
            not_accepting_members_reason: 0,
            max_members: 0,
            nickname: String::new(),
            description: String::new(),
            password: String::new(),
            client_config_data: PartyData::new(),
        }
    }
}

impl PartyConfiguration {
    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    /// Whether a party with `member_count` current members has room for one
    /// more.
    pub fn has_space_for_member(&self, member_count: usize) -> bool {
        self.max_members == 0 || member_count < self.max_members as usize
    }
}
