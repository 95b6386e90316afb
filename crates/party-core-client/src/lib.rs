// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use app::deps::{AppContext, ClientInfo};
pub use app::dtos;
pub use app::event_handlers::{ServerEvent, Subscription};
pub use client::{Client, ClientDelegate};
pub use client_builder::{ClientBuilder, UndefinedTransport};
pub use client_event::ClientEvent;
pub use domain::parties::repos::{ConnectedPartiesRepository, InvitesRepository};
pub use domain::parties::services::{
    PartyPresenceService, PartyPush, PartyRequest, PartyResponse, PartySnapshot, PartyTransport,
    Recipient, TransportError,
};
pub use util::{IDProvider, IncrementingIDProvider, NanoIDProvider};

#[cfg(feature = "test")]
pub mod test;

pub mod app;
mod client;
mod client_builder;
mod client_event;

#[cfg(feature = "test")]
pub mod domain;
#[cfg(not(feature = "test"))]
pub(crate) mod domain;

#[cfg(feature = "test")]
pub mod infra;
#[cfg(not(feature = "test"))]
pub(crate) mod infra;

pub(crate) mod util;
