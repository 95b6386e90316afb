// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use serde::{Deserialize, Serialize};

use crate::domain::shared::models::UserProfile;

use super::PartyData;

/// What a joiner hands to the party leader when asking to be admitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinSubmission {
    pub joiner: UserProfile,
    pub app_id: String,
    pub build_id: String,
    /// Access key or password carried over from the join info, validated by
    /// the leader.
    pub provided_key: Option<String>,
    /// The joiner's initial member data, broadcast on admission.
    pub member_data: PartyData,
}
