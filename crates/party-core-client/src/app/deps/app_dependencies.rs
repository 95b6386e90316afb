// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;

use crate::app::deps::app_context::AppContext;
use crate::app::event_handlers::ClientEventDispatcher;
use crate::domain::parties::repos::{
    ConnectedPartiesRepository, InvitesRepository, PendingOperationsRepository,
};
use crate::domain::parties::services::{
    PartiesDomainService, PartyPresenceService, PartyTransport,
};
use crate::util::IDProvider;

pub(crate) type DynAppContext = Arc<AppContext>;
pub(crate) type DynClientEventDispatcher = Arc<ClientEventDispatcher>;
pub(crate) type DynConnectedPartiesRepository = Arc<dyn ConnectedPartiesRepository>;
pub(crate) type DynIDProvider = Arc<dyn IDProvider>;
pub(crate) type DynInvitesRepository = Arc<dyn InvitesRepository>;
pub(crate) type DynPartiesDomainService = Arc<dyn PartiesDomainService>;
pub(crate) type DynPartyPresenceService = Arc<dyn PartyPresenceService>;
pub(crate) type DynPartyTransport = Arc<dyn PartyTransport>;
pub(crate) type DynPendingOperationsRepository = Arc<PendingOperationsRepository>;
