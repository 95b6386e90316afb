// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};

use crate::domain::parties::models::PartyJoinInfo;
use crate::domain::shared::models::{UserId, UserProfile};

/// Identifies the app and build this client runs as. Leaders compare build
/// ids before admitting a joiner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientInfo {
    pub app_id: String,
    pub build_id: String,
}

pub struct AppContext {
    pub client_info: ClientInfo,
    local_users: RwLock<HashMap<UserId, String>>,
    pending_command_line_invite: Mutex<Option<PartyJoinInfo>>,
}

impl AppContext {
    pub fn new(client_info: ClientInfo) -> Self {
        Self {
            client_info,
            local_users: Default::default(),
            pending_command_line_invite: Default::default(),
        }
    }

    pub fn register_local_user(&self, profile: UserProfile) {
        self.local_users
            .write()
            .insert(profile.id, profile.display_name);
    }

    pub fn is_local_user(&self, user_id: &UserId) -> bool {
        self.local_users.read().contains_key(user_id)
    }

    /// The profile of a registered local user. Falls back to the bare id as
    /// display name for users we only know by id.
    pub fn profile(&self, user_id: &UserId) -> UserProfile {
        let display_name = self
            .local_users
            .read()
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| user_id.to_string());
        UserProfile::new(user_id.clone(), display_name)
    }

    pub fn set_pending_command_line_invite(&self, join_info: PartyJoinInfo) {
        *self.pending_command_line_invite.lock() = Some(join_info);
    }

    /// Returns and clears the join info captured from the command line at
    /// process start, if any.
    pub fn consume_pending_command_line_invite(&self) -> Option<PartyJoinInfo> {
        self.pending_command_line_invite.lock().take()
    }
}
