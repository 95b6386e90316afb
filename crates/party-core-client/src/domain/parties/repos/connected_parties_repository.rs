// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use crate::domain::parties::models::Party;
use crate::domain::shared::models::{PartyId, PartyTypeId, UserId};

pub struct PartyAlreadyExistsError;

/// Cache of all parties a local user has visibility into. One record per
/// (local user, party id); mutations happen through the `Party` handle on
/// the coordinator's execution context.
#[cfg_attr(feature = "test", mockall::automock)]
pub trait ConnectedPartiesRepository: Send + Sync {
    fn get(&self, local_user_id: &UserId, party_id: &PartyId) -> Option<Party>;

    fn get_by_type(&self, local_user_id: &UserId, party_type_id: &PartyTypeId) -> Option<Party>;

    fn get_all(&self, local_user_id: &UserId) -> Vec<Party>;

    fn set(&self, local_user_id: &UserId, party: Party) -> Result<(), PartyAlreadyExistsError>;

    /// Deletes the party identified by `party_id` and returns the removed
    /// record.
    fn delete(&self, local_user_id: &UserId, party_id: &PartyId) -> Option<Party>;

    /// Deletes all of the local user's parties and returns the removed
    /// records.
    fn delete_all(&self, local_user_id: &UserId) -> Vec<Party>;
}
