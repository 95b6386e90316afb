// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use serde::{Deserialize, Serialize};

use crate::domain::shared::models::UserProfile;

use super::PartyJoinInfo;

/// An invitation as it sits in a user's pending-invites list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyInvite {
    pub sender: UserProfile,
    pub join_info: PartyJoinInfo,
}

impl PartyInvite {
    pub fn new(sender: UserProfile, join_info: PartyJoinInfo) -> Self {
        Self { sender, join_info }
    }
}
