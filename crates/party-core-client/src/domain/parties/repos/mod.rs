// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use connected_parties_repository::{ConnectedPartiesRepository, PartyAlreadyExistsError};
pub use invites_repository::InvitesRepository;
pub use pending_operations_repository::PendingOperationsRepository;

mod connected_parties_repository;
mod invites_repository;
mod pending_operations_repository;

#[cfg(feature = "test")]
pub mod mocks {
    pub use super::connected_parties_repository::MockConnectedPartiesRepository;
    pub use super::invites_repository::MockInvitesRepository;
}
