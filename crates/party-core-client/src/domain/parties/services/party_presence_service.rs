// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use crate::domain::parties::models::PartyJoinInfo;
use crate::domain::shared::models::{PartyId, PartyTypeId, UserId};

/// Seam to the presence system. The coordinator publishes what the party's
/// presence permissions allow and reads back what other users advertise; the
/// presence transport and its audience filtering live behind this trait.
#[cfg_attr(feature = "test", mockall::automock)]
pub trait PartyPresenceService: Send + Sync {
    fn publish_advertisement(&self, user_id: &UserId, advertisement: PartyJoinInfo);

    fn withdraw_advertisement(&self, user_id: &UserId, party_id: &PartyId);

    /// The party of the given type that `user_id` is currently broadcasting,
    /// as visible to `viewer_id`.
    fn advertised_party(
        &self,
        viewer_id: &UserId,
        user_id: &UserId,
        party_type_id: &PartyTypeId,
    ) -> Option<PartyJoinInfo>;
}
