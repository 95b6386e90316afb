// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::domain::parties::models::Party;
use crate::domain::parties::repos::{ConnectedPartiesRepository, PartyAlreadyExistsError};
use crate::domain::shared::models::{PartyId, PartyTypeId, UserId};

#[derive(Default)]
pub struct InMemoryPartiesRepository {
    parties: RwLock<HashMap<UserId, HashMap<PartyId, Party>>>,
}

impl InMemoryPartiesRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConnectedPartiesRepository for InMemoryPartiesRepository {
    fn get(&self, local_user_id: &UserId, party_id: &PartyId) -> Option<Party> {
        self.parties
            .read()
            .get(local_user_id)?
            .get(party_id)
            .cloned()
    }

    fn get_by_type(&self, local_user_id: &UserId, party_type_id: &PartyTypeId) -> Option<Party> {
        self.parties
            .read()
            .get(local_user_id)?
            .values()
            .find(|party| party.party_type_id == *party_type_id)
            .cloned()
    }

    fn get_all(&self, local_user_id: &UserId) -> Vec<Party> {
        self.parties
            .read()
            .get(local_user_id)
            .map(|parties| parties.values().cloned().collect())
            .unwrap_or_default()
    }

    fn set(&self, local_user_id: &UserId, party: Party) -> Result<(), PartyAlreadyExistsError> {
        let mut parties = self.parties.write();
        let user_parties = parties.entry(local_user_id.clone()).or_default();
        if user_parties.contains_key(&party.party_id) {
            return Err(PartyAlreadyExistsError);
        }
        user_parties.insert(party.party_id.clone(), party);
        Ok(())
    }

    fn delete(&self, local_user_id: &UserId, party_id: &PartyId) -> Option<Party> {
        self.parties
            .write()
            .get_mut(local_user_id)?
            .remove(party_id)
    }

    fn delete_all(&self, local_user_id: &UserId) -> Vec<Party> {
        self.parties
            .write()
            .remove(local_user_id)
            .map(|parties| parties.into_values().collect())
            .unwrap_or_default()
    }
}
