// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use parties_domain_service::{PartiesDomainService, PartiesDomainServiceDependencies};

mod parties_domain_service;
