// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use tracing::debug;

use crate::app::deps::DynPartiesDomainService;
use crate::domain::shared::models::UserId;

use super::ServerEvent;

/// Feeds inbound transport traffic into the coordinator.
pub struct PartiesEventHandler {
    parties_domain_service: DynPartiesDomainService,
}

impl PartiesEventHandler {
    pub fn new(parties_domain_service: DynPartiesDomainService) -> Self {
        Self {
            parties_domain_service,
        }
    }

    pub fn handle_event(&self, local_user_id: &UserId, event: ServerEvent) {
        debug!(user = %local_user_id, ?event, "Handling server event");

        match event {
            ServerEvent::Request {
                request_id,
                sender,
                request,
            } => self.parties_domain_service.handle_request(
                local_user_id,
                &request_id,
                &sender,
                request,
            ),
            ServerEvent::Response {
                request_id,
                payload,
            } => self
                .parties_domain_service
                .handle_response(local_user_id, &request_id, payload),
            ServerEvent::RequestTimedOut { request_id } => self
                .parties_domain_service
                .handle_request_timed_out(local_user_id, &request_id),
            ServerEvent::Push { sender, push } => self
                .parties_domain_service
                .handle_push(local_user_id, &sender, push),
            ServerEvent::ConnectionStatusChanged { connected } => self
                .parties_domain_service
                .handle_connection_status_changed(local_user_id, connected),
        }
    }
}
