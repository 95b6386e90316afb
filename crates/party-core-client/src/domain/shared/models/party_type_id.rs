// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Classifier distinguishing concurrent party "slots" a user may occupy.
/// A user can be in at most one party per distinct type id at a time.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyTypeId(u32);

impl PartyTypeId {
    /// The party addressable via the social panel.
    pub const PRIMARY: PartyTypeId = PartyTypeId(0x11111111);

    pub fn primary() -> Self {
        Self::PRIMARY
    }

    /// Builds a caller-defined type id. The primary value is reserved.
    pub fn custom(value: u32) -> Self {
        assert!(
            value != Self::PRIMARY.0,
            "PartyTypeId value {:#x} is reserved for the primary party",
            value
        );
        PartyTypeId(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Rebuilds a type id from its raw wire value, primary or not.
    pub(crate) fn from_value(value: u32) -> Self {
        PartyTypeId(value)
    }
}

impl Debug for PartyTypeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "PartyTypeId({:#010x})", self.0)
    }
}

impl Display for PartyTypeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
