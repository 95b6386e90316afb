// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use id_provider::{IDProvider, IncrementingIDProvider, NanoIDProvider};

mod id_provider;
