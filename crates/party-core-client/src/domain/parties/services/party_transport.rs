// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use serde::{Deserialize, Serialize};

use crate::domain::parties::models::{
    InvitationResponse, JoinPartyCompletionResult, JoinSubmission, MemberExitedReason, PartyConfiguration,
    PartyData, PartyInvite, PartyMember,
};
use crate::domain::shared::models::{PartyId, PartyTypeId, RequestId, RoomId, UserId, UserProfile};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("The transport is not connected.")]
    Disconnected,
    #[error("No route to recipient {0}.")]
    NoRoute(UserId),
    #[error("Message could not be delivered: {0}")]
    DeliveryFailed(String),
}

/// Where a request is headed: the backing party service, or the coordinator
/// of another user (usually a party leader).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    Service,
    User(UserId),
}

/// A request expecting exactly one correlated response or a timeout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PartyRequest {
    /// To the service: allocate a party.
    Create {
        party_type_id: PartyTypeId,
        config: PartyConfiguration,
    },
    /// To the service: replace the configuration, optionally rotating the
    /// access key.
    Update {
        party_id: PartyId,
        config: PartyConfiguration,
        regenerate_access_key: bool,
    },
    /// To the leader: ask to be admitted.
    Join {
        party_id: PartyId,
        party_type_id: PartyTypeId,
        submission: JoinSubmission,
    },
    /// To the leader: re-establish membership after a disconnect.
    Rejoin { party_id: PartyId },
    /// To the leader: give up membership.
    Leave { party_id: PartyId },
}

/// Full party state handed to an admitted or rejoining member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartySnapshot {
    pub party_id: PartyId,
    pub party_type_id: PartyTypeId,
    pub leader: UserId,
    pub config: PartyConfiguration,
    pub room_id: RoomId,
    pub access_key: Option<String>,
    pub members: Vec<PartyMember>,
    pub party_data: PartyData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PartyResponse {
    Created {
        party_id: PartyId,
        room_id: RoomId,
        access_key: String,
    },
    Updated {
        access_key: Option<String>,
    },
    JoinApproved {
        snapshot: PartySnapshot,
    },
    JoinDenied {
        result: JoinPartyCompletionResult,
        not_approved_reason: i32,
    },
    Rejoined {
        snapshot: PartySnapshot,
    },
    LeaveAck,
    Error {
        message: String,
    },
}

/// Remote-initiated traffic fanned out to individual party members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PartyPush {
    Invite {
        invite: PartyInvite,
    },
    InviteRequest {
        party_id: PartyId,
        request_for: UserProfile,
    },
    InviteResponse {
        party_id: PartyId,
        response: InvitationResponse,
    },
    MemberJoined {
        party_id: PartyId,
        member: PartyMember,
    },
    MemberExited {
        party_id: PartyId,
        member_id: UserId,
        reason: MemberExitedReason,
    },
    MemberPromoted {
        party_id: PartyId,
        member_id: UserId,
    },
    MemberDisconnected {
        party_id: PartyId,
        member_id: UserId,
    },
    MemberRejoined {
        party_id: PartyId,
        member_id: UserId,
    },
    ConfigChanged {
        party_id: PartyId,
        config: PartyConfiguration,
        access_key: Option<String>,
    },
    PartyDataChanged {
        party_id: PartyId,
        data: PartyData,
    },
    MemberDataChanged {
        party_id: PartyId,
        member_id: UserId,
        data: PartyData,
    },
    /// Delivered to the member that was kicked.
    Kicked {
        party_id: PartyId,
    },
    JoinRequestResponse {
        party_id: PartyId,
        member_id: UserId,
        was_accepted: bool,
    },
}

/// Reliable messaging channel carrying the party protocol. Sends must not
/// block; responses, pushes and timeouts come back through
/// `Client::handle_server_event` on the receive loop of the implementation.
///
/// Delivery expectations: at-least-once for pushes, at-most-once (or an
/// explicit timeout event) for request/response pairs.
#[cfg_attr(feature = "test", mockall::automock)]
pub trait PartyTransport: Send + Sync {
    fn send_request(
        &self,
        sender: &UserId,
        recipient: &Recipient,
        request_id: &RequestId,
        request: PartyRequest,
    ) -> Result<(), TransportError>;

    fn respond(
        &self,
        sender: &UserId,
        recipient: &UserId,
        request_id: &RequestId,
        response: PartyResponse,
    ) -> Result<(), TransportError>;

    fn push(
        &self,
        sender: &UserId,
        recipient: &UserId,
        push: PartyPush,
    ) -> Result<(), TransportError>;
}
