// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::Display;

/// Audience allowed to see a piece of party information via presence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
pub enum PermissionType {
    None,
    Leader,
    Friend,
    Anyone,
}

/// Controls who may discover the party id and its access key through the
/// presence system. The key audience can never exceed the id audience, a
/// value violating that cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PresencePermissions {
    publish_id: PermissionType,
    publish_key: PermissionType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("publish-key permission ({publish_key}) may not exceed publish-id permission ({publish_id})")]
pub struct InvalidPresencePermissions {
    pub publish_id: PermissionType,
    pub publish_key: PermissionType,
}

impl PresencePermissions {
    pub const DO_NOT_PUBLISH: Self = Self::preset(PermissionType::None, PermissionType::None);
    pub const LEADER_PUBLISH_ID_NONE_PUBLISH_KEY: Self =
        Self::preset(PermissionType::Leader, PermissionType::None);
    pub const LEADER_PUBLISH_ID_LEADER_PUBLISH_KEY: Self =
        Self::preset(PermissionType::Leader, PermissionType::Leader);
    pub const FRIEND_PUBLISH_ID_NONE_PUBLISH_KEY: Self =
        Self::preset(PermissionType::Friend, PermissionType::None);
    pub const FRIEND_PUBLISH_ID_LEADER_PUBLISH_KEY: Self =
        Self::preset(PermissionType::Friend, PermissionType::Leader);
    pub const FRIEND_PUBLISH_ID_FRIEND_PUBLISH_KEY: Self =
        Self::preset(PermissionType::Friend, PermissionType::Friend);
    pub const ANYONE_PUBLISH_ID_NONE_PUBLISH_KEY: Self =
        Self::preset(PermissionType::Anyone, PermissionType::None);
    pub const ANYONE_PUBLISH_ID_LEADER_PUBLISH_KEY: Self =
        Self::preset(PermissionType::Anyone, PermissionType::Leader);
    pub const ANYONE_PUBLISH_ID_FRIEND_PUBLISH_KEY: Self =
        Self::preset(PermissionType::Anyone, PermissionType::Friend);
    pub const ANYONE_PUBLISH_ID_ANYONE_PUBLISH_KEY: Self =
        Self::preset(PermissionType::Anyone, PermissionType::Anyone);

    pub const FRIENDS_INVITE_ONLY: Self = Self::LEADER_PUBLISH_ID_NONE_PUBLISH_KEY;
    pub const FRIENDS_OF_FRIENDS_INVITE_ONLY: Self = Self::FRIEND_PUBLISH_ID_NONE_PUBLISH_KEY;
    pub const PUBLIC_INVITE_ONLY: Self = Self::ANYONE_PUBLISH_ID_NONE_PUBLISH_KEY;
    pub const FRIENDS_ONLY: Self = Self::LEADER_PUBLISH_ID_LEADER_PUBLISH_KEY;
    pub const FRIENDS_OF_FRIENDS_ONLY: Self = Self::FRIEND_PUBLISH_ID_FRIEND_PUBLISH_KEY;
    pub const PUBLIC: Self = Self::ANYONE_PUBLISH_ID_ANYONE_PUBLISH_KEY;

    /// Builds a permission pair, rejecting any combination where the key
    /// would be visible to a wider audience than the id.
    pub fn new(
        publish_id: PermissionType,
        publish_key: PermissionType,
    ) -> Result<Self, InvalidPresencePermissions> {
        if publish_key > publish_id {
            return Err(InvalidPresencePermissions {
                publish_id,
                publish_key,
            });
        }
        Ok(Self {
            publish_id,
            publish_key,
        })
    }

    pub fn publish_id(&self) -> PermissionType {
        self.publish_id
    }

    pub fn publish_key(&self) -> PermissionType {
        self.publish_key
    }

    pub fn publishes_id(&self) -> bool {
        self.publish_id != PermissionType::None
    }

    pub fn publishes_key(&self) -> bool {
        self.publish_key != PermissionType::None
    }

    const fn preset(publish_id: PermissionType, publish_key: PermissionType) -> Self {
        Self {
            publish_id,
            publish_key,
        }
    }
}

impl Default for PresencePermissions {
    fn default() -> Self {
        Self::PUBLIC
    }
}

// Deserialization goes through the validating constructor so that no wire
// payload can smuggle in an invalid combination.
impl<'de> Deserialize<'de> for PresencePermissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            publish_id: PermissionType,
            publish_key: PermissionType,
        }

        let raw = Raw::deserialize(deserializer)?;
        PresencePermissions::new(raw.publish_id, raw.publish_key).map_err(serde::de::Error::custom)
    }
}
