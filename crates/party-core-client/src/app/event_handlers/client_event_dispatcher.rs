// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::RwLock;

use crate::client::ClientInner;
use crate::{Client, ClientDelegate, ClientEvent};

/// Handle identifying one registered subscriber. Dropping it does not
/// unsubscribe; pass it back to `Client::unsubscribe`.
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription(u64);

/// Multicasts client events to all registered subscribers. Emission iterates
/// a snapshot of the subscriber list, so subscribing or unsubscribing from
/// within a handler does not affect the emission pass that delivered it.
pub struct ClientEventDispatcher {
    client: OnceLock<Weak<ClientInner>>,
    next_subscription: AtomicU64,
    subscribers: RwLock<Vec<(u64, Arc<dyn ClientDelegate>)>>,
}

impl ClientEventDispatcher {
    pub fn new() -> Self {
        Self {
            client: Default::default(),
            next_subscription: AtomicU64::new(1),
            subscribers: Default::default(),
        }
    }

    pub(crate) fn set_client(&self, client: Weak<ClientInner>) {
        _ = self.client.set(client);
    }

    pub fn subscribe(&self, delegate: Arc<dyn ClientDelegate>) -> Subscription {
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed);
        self.subscribers.write().push((id, delegate));
        Subscription(id)
    }

    pub fn unsubscribe(&self, subscription: &Subscription) {
        self.subscribers
            .write()
            .retain(|(id, _)| *id != subscription.0);
    }

    pub fn dispatch_event(&self, event: ClientEvent) {
        let Some(client_inner) = self
            .client
            .get()
            .expect("ClientInner was not set on ClientEventDispatcher")
            .upgrade()
        else {
            return;
        };

        let subscribers = self.subscribers.read().clone();
        for (_, delegate) in subscribers {
            delegate.handle_event(Client::from(client_inner.clone()), event.clone())
        }
    }
}

impl Default for ClientEventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
