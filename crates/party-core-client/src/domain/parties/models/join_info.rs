// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::domain::shared::models::{PartyId, PartyTypeId, UserProfile};

use super::{PartyData, PartyError};

/// Everything a user needs to attempt joining a party they are not a member
/// of. Immutable once built; capability flags are derived, never stored.
///
/// The optional key is opaque material the leader validates on join: the
/// party's access key (as carried by an invite) or, where the configuration
/// allows it, the party password a caller obtained out of band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PartyJoinInfo {
    party_id: PartyId,
    party_type_id: PartyTypeId,
    leader: UserProfile,
    source: UserProfile,
    key: Option<String>,
    has_password: bool,
    is_accepting_members: bool,
    not_accepting_reason: i32,
    app_id: String,
    build_id: String,
    client_data: PartyData,
}

impl Default for PartyJoinInfo {
    fn default() -> Self {
        Self {
            party_id: PartyId::from(""),
            party_type_id: PartyTypeId::primary(),
            leader: UserProfile::new("", ""),
            source: UserProfile::new("", ""),
            key: None,
            has_password: false,
            is_accepting_members: false,
            not_accepting_reason: 0,
            app_id: String::new(),
            build_id: String::new(),
            client_data: PartyData::new(),
        }
    }
}

impl PartyJoinInfo {
    pub fn new(
        party_id: PartyId,
        party_type_id: PartyTypeId,
        leader: UserProfile,
        source: UserProfile,
    ) -> Self {
        Self {
            party_id,
            party_type_id,
            leader,
            source,
            ..Default::default()
        }
    }

    pub fn with_key(mut self, key: Option<String>) -> Self {
        self.key = key;
        self
    }

    pub fn with_password(mut self, has_password: bool) -> Self {
        self.has_password = has_password;
        self
    }

    pub fn with_accepting_members(mut self, accepting: bool, reason: i32) -> Self {
        self.is_accepting_members = accepting;
        self.not_accepting_reason = reason;
        self
    }

    pub fn with_app_info(mut self, app_id: impl Into<String>, build_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self.build_id = build_id.into();
        self
    }

    pub fn with_client_data(mut self, client_data: PartyData) -> Self {
        self.client_data = client_data;
        self
    }
}

impl PartyJoinInfo {
    pub fn party_id(&self) -> &PartyId {
        &self.party_id
    }

    pub fn party_type_id(&self) -> PartyTypeId {
        self.party_type_id
    }

    pub fn leader(&self) -> &UserProfile {
        &self.leader
    }

    pub fn source(&self) -> &UserProfile {
        &self.source
    }

    /// True if the join info carries some form of key. Does not guarantee
    /// the validity of that key.
    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    pub(crate) fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// True if a password can be used to bypass the generated access key.
    pub fn has_password(&self) -> bool {
        self.has_password
    }

    pub fn is_accepting_members(&self) -> bool {
        self.is_accepting_members
    }

    pub fn not_accepting_reason(&self) -> i32 {
        self.not_accepting_reason
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn build_id(&self) -> &str {
        &self.build_id
    }

    pub fn client_data(&self) -> &PartyData {
        &self.client_data
    }

    pub fn is_valid(&self) -> bool {
        !self.party_id.as_str().is_empty()
            && !self.leader.id.as_str().is_empty()
            && !self.source.id.as_str().is_empty()
    }

    pub fn is_party_of_one(&self) -> bool {
        self.leader.id == self.source.id
    }

    /// Whether this join info can be used to join outright.
    pub fn can_join(&self) -> bool {
        self.is_valid() && self.is_accepting_members
    }

    /// Whether this join info can be used to join given a password.
    pub fn can_join_with_password(&self) -> bool {
        self.is_valid() && self.is_accepting_members && self.has_password
    }

    /// Whether this join info carries enough to ask its source for an invite
    /// instead.
    pub fn can_request_an_invite(&self) -> bool {
        self.is_valid() && !self.can_join() && !self.can_join_with_password()
    }
}

impl PartyJoinInfo {
    /// Full-fidelity structured encoding, including the client data blob.
    pub fn to_json(&self) -> Result<String, PartyError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PartyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compact command-line/URL-safe token covering the minimum fields
    /// required to attempt a join.
    pub fn to_token(&self) -> String {
        let raw = format!(
            "{}|{:08x}|{}|{}|{}",
            self.party_id,
            self.party_type_id.value(),
            self.leader.id,
            self.source.id,
            self.is_accepting_members as u8,
        );
        URL_SAFE_NO_PAD.encode(raw)
    }

    pub fn from_token(token: &str) -> Result<Self, PartyError> {
        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| PartyError::InvalidToken)?;
        let raw = String::from_utf8(raw).map_err(|_| PartyError::InvalidToken)?;

        let mut fields = raw.split('|');
        let (Some(party_id), Some(type_id), Some(leader_id), Some(source_id), Some(accepting)) = (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) else {
            return Err(PartyError::InvalidToken);
        };
        if party_id.is_empty() || fields.next().is_some() {
            return Err(PartyError::InvalidToken);
        }

        let type_id = u32::from_str_radix(type_id, 16).map_err(|_| PartyError::InvalidToken)?;
        let accepting = match accepting {
            "0" => false,
            "1" => true,
            _ => return Err(PartyError::InvalidToken),
        };

        Ok(Self {
            party_id: PartyId::from(party_id),
            party_type_id: PartyTypeId::from_value(type_id),
            leader: UserProfile::new(leader_id, ""),
            source: UserProfile::new(source_id, ""),
            is_accepting_members: accepting,
            ..Default::default()
        })
    }
}
