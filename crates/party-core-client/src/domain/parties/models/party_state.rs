// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Lifecycle state of a party as seen by one local user. Transitions are
/// driven exclusively by the coordinator, never by the party record itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum PartyState {
    #[default]
    None,
    #[strum(serialize = "Create pending")]
    CreatePending,
    #[strum(serialize = "Join pending")]
    JoinPending,
    #[strum(serialize = "Leave pending")]
    LeavePending,
    Active,
    Disconnected,
    Reconnecting,
    #[strum(serialize = "Clean up")]
    CleanUp,
}

impl PartyState {
    /// A lifecycle operation is in flight. No second lifecycle operation may
    /// start while this is the case.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            PartyState::CreatePending | PartyState::JoinPending | PartyState::LeavePending
        )
    }
}
