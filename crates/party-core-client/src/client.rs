// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::ops::Deref;
use std::sync::Arc;

use crate::app::deps::{DynAppContext, DynClientEventDispatcher};
use crate::app::event_handlers::{PartiesEventHandler, ServerEvent, Subscription};
use crate::app::services::{InvitesService, PartiesService};
use crate::client_builder::{ClientBuilder, UndefinedTransport};
use crate::domain::shared::models::{UserId, UserProfile};
use crate::ClientEvent;

#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

/// Receives the coordinator's notifications. Handlers run on the emitting
/// context and must not block.
pub trait ClientDelegate: Send + Sync {
    fn handle_event(&self, client: Client, event: ClientEvent);
}

impl Client {
    pub fn builder() -> ClientBuilder<UndefinedTransport> {
        ClientBuilder::new()
    }
}

pub struct ClientInner {
    pub parties: PartiesService,
    pub invites: InvitesService,
    pub(crate) ctx: DynAppContext,
    pub(crate) event_handler: PartiesEventHandler,
    pub(crate) client_event_dispatcher: DynClientEventDispatcher,
}

impl From<Arc<ClientInner>> for Client {
    fn from(inner: Arc<ClientInner>) -> Self {
        Client { inner }
    }
}

impl Deref for Client {
    type Target = ClientInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Client {
    /// Registers a user the process acts on behalf of. Operations for
    /// unregistered users are rejected synchronously.
    pub fn register_local_user(&self, profile: UserProfile) {
        self.ctx.register_local_user(profile)
    }

    pub fn subscribe(&self, delegate: Arc<dyn ClientDelegate>) -> Subscription {
        self.client_event_dispatcher.subscribe(delegate)
    }

    pub fn unsubscribe(&self, subscription: &Subscription) {
        self.client_event_dispatcher.unsubscribe(subscription)
    }

    /// Entry point for inbound traffic. The transport's receive loop calls
    /// this on one logical execution context per process.
    pub fn handle_server_event(&self, local_user_id: &UserId, event: ServerEvent) {
        self.event_handler.handle_event(local_user_id, event)
    }
}
