// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::app::event_handlers::ServerEvent;
use crate::domain::parties::services::{
    PartyPush, PartyRequest, PartyResponse, PartyTransport, Recipient, TransportError,
};
use crate::domain::shared::models::{PartyId, RequestId, RoomId, UserId};
use crate::Client;

/// Routes party-protocol messages between in-process clients and plays the
/// minimal backend role: allocating party ids, rooms and access keys, and
/// timing out requests to unreachable peers.
///
/// Delivery is synchronous: a request to the service is answered before
/// `send_request` returns. Real transports do this on their own receive
/// loop instead; the coordinator is written for either.
#[derive(Clone, Default)]
pub struct LocalRelay {
    inner: Arc<LocalRelayInner>,
}

#[derive(Default)]
struct LocalRelayInner {
    clients: RwLock<HashMap<UserId, Client>>,
    unreachable: RwLock<HashSet<UserId>>,
}

impl LocalRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_client(&self, user_id: &UserId, client: &Client) {
        self.inner
            .clients
            .write()
            .insert(user_id.clone(), client.clone());
    }

    /// Requests to an unreachable user time out instead of being delivered;
    /// pushes and responses to them fail.
    pub fn set_reachable(&self, user_id: &UserId, reachable: bool) {
        if reachable {
            self.inner.unreachable.write().remove(user_id);
        } else {
            self.inner.unreachable.write().insert(user_id.clone());
        }
    }

    /// Takes the user offline and tells their client about it.
    pub fn disconnect_user(&self, user_id: &UserId) {
        self.set_reachable(user_id, false);
        self.deliver(user_id, ServerEvent::ConnectionStatusChanged { connected: false });
    }

    pub fn reconnect_user(&self, user_id: &UserId) {
        self.set_reachable(user_id, true);
        self.deliver(user_id, ServerEvent::ConnectionStatusChanged { connected: true });
    }

    fn is_unreachable(&self, user_id: &UserId) -> bool {
        self.inner.unreachable.read().contains(user_id)
    }

    /// Hands the event to the recipient's client. The client is looked up
    /// and the lock released first, event handling reenters the relay.
    fn deliver(&self, user_id: &UserId, event: ServerEvent) -> bool {
        let client = self.inner.clients.read().get(user_id).cloned();
        let Some(client) = client else {
            return false;
        };
        client.handle_server_event(user_id, event);
        true
    }

    fn answer_service_request(&self, request: PartyRequest) -> PartyResponse {
        match request {
            PartyRequest::Create { .. } => PartyResponse::Created {
                party_id: PartyId::from(Uuid::new_v4().to_string()),
                room_id: RoomId::from(format!("party-room-{}", Uuid::new_v4())),
                access_key: Uuid::new_v4().to_string(),
            },
            PartyRequest::Update {
                regenerate_access_key,
                ..
            } => PartyResponse::Updated {
                access_key: regenerate_access_key.then(|| Uuid::new_v4().to_string()),
            },
            request => PartyResponse::Error {
                message: format!("Unsupported service request: {:?}", request),
            },
        }
    }
}

impl PartyTransport for LocalRelay {
    fn send_request(
        &self,
        sender: &UserId,
        recipient: &Recipient,
        request_id: &RequestId,
        request: PartyRequest,
    ) -> Result<(), TransportError> {
        match recipient {
            Recipient::Service => {
                let response = self.answer_service_request(request);
                self.deliver(
                    sender,
                    ServerEvent::Response {
                        request_id: request_id.clone(),
                        payload: response,
                    },
                );
                Ok(())
            }
            Recipient::User(user_id) => {
                if self.is_unreachable(user_id) {
                    // The peer won't answer; surface the timeout right away.
                    self.deliver(
                        sender,
                        ServerEvent::RequestTimedOut {
                            request_id: request_id.clone(),
                        },
                    );
                    return Ok(());
                }
                if !self.deliver(
                    user_id,
                    ServerEvent::Request {
                        request_id: request_id.clone(),
                        sender: sender.clone(),
                        request,
                    },
                ) {
                    return Err(TransportError::NoRoute(user_id.clone()));
                }
                Ok(())
            }
        }
    }

    fn respond(
        &self,
        _sender: &UserId,
        recipient: &UserId,
        request_id: &RequestId,
        response: PartyResponse,
    ) -> Result<(), TransportError> {
        if self.is_unreachable(recipient) {
            return Err(TransportError::NoRoute(recipient.clone()));
        }
        if !self.deliver(
            recipient,
            ServerEvent::Response {
                request_id: request_id.clone(),
                payload: response,
            },
        ) {
            return Err(TransportError::NoRoute(recipient.clone()));
        }
        Ok(())
    }

    fn push(
        &self,
        sender: &UserId,
        recipient: &UserId,
        push: PartyPush,
    ) -> Result<(), TransportError> {
        if self.is_unreachable(recipient) {
            return Err(TransportError::NoRoute(recipient.clone()));
        }
        if !self.deliver(
            recipient,
            ServerEvent::Push {
                sender: sender.clone(),
                push,
            },
        ) {
            return Err(TransportError::NoRoute(recipient.clone()));
        }
        Ok(())
    }
}
