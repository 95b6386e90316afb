// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::parties::models::PartyJoinInfo;
use crate::domain::parties::services::PartyPresenceService;
use crate::domain::shared::models::{PartyId, PartyTypeId, UserId};

/// A process-local presence board. Clones share the underlying board, so
/// several clients wired with the same instance see each other's
/// advertisements — the shape the integration tests use.
///
/// Audience filtering (leader/friend/anyone) is the real presence system's
/// job; this board only distinguishes published from unpublished.
#[derive(Clone, Default)]
pub struct InMemoryPartyPresenceService {
    board: Arc<RwLock<HashMap<(UserId, u32), PartyJoinInfo>>>,
}

impl InMemoryPartyPresenceService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PartyPresenceService for InMemoryPartyPresenceService {
    fn publish_advertisement(&self, user_id: &UserId, advertisement: PartyJoinInfo) {
        self.board.write().insert(
            (user_id.clone(), advertisement.party_type_id().value()),
            advertisement,
        );
    }

    fn withdraw_advertisement(&self, user_id: &UserId, party_id: &PartyId) {
        self.board
            .write()
            .retain(|(user, _), advert| user != user_id || advert.party_id() != party_id);
    }

    fn advertised_party(
        &self,
        _viewer_id: &UserId,
        user_id: &UserId,
        party_type_id: &PartyTypeId,
    ) -> Option<PartyJoinInfo> {
        self.board
            .read()
            .get(&(user_id.clone(), party_type_id.value()))
            .cloned()
    }
}
