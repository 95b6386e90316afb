// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use crate::domain::parties::services::{PartyPush, PartyRequest, PartyResponse};
use crate::domain::shared::models::{RequestId, UserId};

/// Inbound party-protocol traffic for one local user. Produced by the
/// transport's receive loop and fed to `Client::handle_server_event`.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// A request another user routed to the local user, typically because
    /// the local user leads the party in question.
    Request {
        request_id: RequestId,
        sender: UserId,
        request: PartyRequest,
    },

    /// The response correlated with a request this client sent earlier.
    Response {
        request_id: RequestId,
        payload: PartyResponse,
    },

    /// The transport gave up waiting for a response.
    RequestTimedOut { request_id: RequestId },

    /// Remote-initiated party traffic.
    Push { sender: UserId, push: PartyPush },

    /// Transport connectivity for the local user changed.
    ConnectionStatusChanged { connected: bool },
}
