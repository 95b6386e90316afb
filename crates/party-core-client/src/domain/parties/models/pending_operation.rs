// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::fmt::{Debug, Formatter};

use crate::domain::shared::models::{PartyId, PartyTypeId, UserId};

use super::{
    CreatePartyCompletionResult, JoinPartyCompletionResult, KickMemberCompletionResult,
    LeavePartyCompletionResult, PartyConfiguration, PromoteMemberCompletionResult,
    RequestPartyInvitationCompletionResult, SendPartyInvitationCompletionResult,
    UpdateConfigCompletionResult,
};

pub type CreatePartyCallback =
    Box<dyn FnOnce(&UserId, Option<&PartyId>, CreatePartyCompletionResult) + Send>;
pub type JoinPartyCallback =
    Box<dyn FnOnce(&UserId, &PartyId, JoinPartyCompletionResult, i32) + Send>;
pub type LeavePartyCallback = Box<dyn FnOnce(&UserId, &PartyId, LeavePartyCompletionResult) + Send>;
pub type UpdatePartyCallback =
    Box<dyn FnOnce(&UserId, &PartyId, UpdateConfigCompletionResult) + Send>;
// The target member id is the third parameter for both kick and promote.
pub type KickMemberCallback =
    Box<dyn FnOnce(&UserId, &PartyId, &UserId, KickMemberCompletionResult) + Send>;
pub type PromoteMemberCallback =
    Box<dyn FnOnce(&UserId, &PartyId, &UserId, PromoteMemberCompletionResult) + Send>;
pub type SendInvitationCallback =
    Box<dyn FnOnce(&UserId, &PartyId, &UserId, SendPartyInvitationCompletionResult) + Send>;
pub type RequestInvitationCallback =
    Box<dyn FnOnce(&UserId, &PartyId, RequestPartyInvitationCompletionResult) + Send>;

/// An accepted operation waiting for its response or timeout. Owns the
/// one-shot completion callback; resolving the record consumes it, so the
/// callback cannot fire twice.
pub enum PendingOperation {
    Create {
        local_user_id: UserId,
        party_type_id: PartyTypeId,
        /// The configuration the caller asked for; the service response
        /// only carries the allocated ids.
        config: PartyConfiguration,
        callback: CreatePartyCallback,
    },
    Join {
        local_user_id: UserId,
        party_id: PartyId,
        callback: JoinPartyCallback,
    },
    Leave {
        local_user_id: UserId,
        party_id: PartyId,
        callback: LeavePartyCallback,
    },
    Update {
        local_user_id: UserId,
        party_id: PartyId,
        /// The replacement configuration, applied once the service acks.
        config: PartyConfiguration,
        callback: UpdatePartyCallback,
    },
    /// Internal reconnect handshake. Has no caller-facing callback.
    Rejoin {
        local_user_id: UserId,
        party_id: PartyId,
    },
}

impl PendingOperation {
    pub fn local_user_id(&self) -> &UserId {
        match self {
            Self::Create { local_user_id, .. }
            | Self::Join { local_user_id, .. }
            | Self::Leave { local_user_id, .. }
            | Self::Update { local_user_id, .. }
            | Self::Rejoin { local_user_id, .. } => local_user_id,
        }
    }

    pub fn party_id(&self) -> Option<&PartyId> {
        match self {
            Self::Create { .. } => None,
            Self::Join { party_id, .. }
            | Self::Leave { party_id, .. }
            | Self::Update { party_id, .. }
            | Self::Rejoin { party_id, .. } => Some(party_id),
        }
    }

    pub fn concerns(&self, local_user_id: &UserId, party_id: &PartyId) -> bool {
        self.local_user_id() == local_user_id && self.party_id() == Some(party_id)
    }

    /// Resolves the operation with its `NoResponse` result.
    pub fn time_out(self) {
        match self {
            Self::Create {
                local_user_id,
                callback,
                ..
            } => callback(&local_user_id, None, CreatePartyCompletionResult::NoResponse),
            Self::Join {
                local_user_id,
                party_id,
                callback,
            } => callback(
                &local_user_id,
                &party_id,
                JoinPartyCompletionResult::NoResponse,
                0,
            ),
            Self::Leave {
                local_user_id,
                party_id,
                callback,
            } => callback(
                &local_user_id,
                &party_id,
                LeavePartyCompletionResult::NoResponse,
            ),
            Self::Update {
                local_user_id,
                party_id,
                callback,
                ..
            } => callback(
                &local_user_id,
                &party_id,
                UpdateConfigCompletionResult::NoResponse,
            ),
            Self::Rejoin { .. } => {}
        }
    }

    /// Resolves the operation with a client-local failure. Used when the
    /// owning party is cleaned up; a pending operation must never vanish
    /// without its callback firing.
    pub fn fail(self) {
        match self {
            Self::Create {
                local_user_id,
                callback,
                ..
            } => callback(
                &local_user_id,
                None,
                CreatePartyCompletionResult::UnknownClientFailure,
            ),
            Self::Join {
                local_user_id,
                party_id,
                callback,
                ..
            } => callback(
                &local_user_id,
                &party_id,
                JoinPartyCompletionResult::UnknownClientFailure,
                0,
            ),
            Self::Leave {
                local_user_id,
                party_id,
                callback,
            } => callback(
                &local_user_id,
                &party_id,
                LeavePartyCompletionResult::UnknownClientFailure,
            ),
            Self::Update {
                local_user_id,
                party_id,
                callback,
                ..
            } => callback(
                &local_user_id,
                &party_id,
                UpdateConfigCompletionResult::UnknownClientFailure,
            ),
            Self::Rejoin { .. } => {}
        }
    }

    /// Resolves the operation with the remote side's unknown-failure result.
    pub fn fail_internal(self) {
        match self {
            Self::Create {
                local_user_id,
                callback,
                ..
            } => callback(
                &local_user_id,
                None,
                CreatePartyCompletionResult::UnknownInternalFailure,
            ),
            Self::Join {
                local_user_id,
                party_id,
                callback,
                ..
            } => callback(
                &local_user_id,
                &party_id,
                JoinPartyCompletionResult::UnknownInternalFailure,
                0,
            ),
            Self::Leave {
                local_user_id,
                party_id,
                callback,
            } => callback(
                &local_user_id,
                &party_id,
                LeavePartyCompletionResult::UnknownInternalFailure,
            ),
            Self::Update {
                local_user_id,
                party_id,
                callback,
                ..
            } => callback(
                &local_user_id,
                &party_id,
                UpdateConfigCompletionResult::UnknownInternalFailure,
            ),
            Self::Rejoin { .. } => {}
        }
    }

    /// Resolves the operation after the transport refused to carry its
    /// request.
    pub fn messaging_failure(self) {
        match self {
            Self::Create {
                local_user_id,
                callback,
                ..
            } => callback(
                &local_user_id,
                None,
                CreatePartyCompletionResult::UnknownInternalFailure,
            ),
            Self::Join {
                local_user_id,
                party_id,
                callback,
                ..
            } => callback(
                &local_user_id,
                &party_id,
                JoinPartyCompletionResult::MessagingFailure,
                0,
            ),
            Self::Leave {
                local_user_id,
                party_id,
                callback,
            } => callback(
                &local_user_id,
                &party_id,
                LeavePartyCompletionResult::MessagingFailure,
            ),
            Self::Update {
                local_user_id,
                party_id,
                callback,
                ..
            } => callback(
                &local_user_id,
                &party_id,
                UpdateConfigCompletionResult::MessagingFailure,
            ),
            Self::Rejoin { .. } => {}
        }
    }
}

impl Debug for PendingOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create {
                local_user_id,
                party_type_id,
                ..
            } => f
                .debug_struct("Create")
                .field("local_user_id", local_user_id)
                .field("party_type_id", party_type_id)
                .finish_non_exhaustive(),
            Self::Join {
                local_user_id,
                party_id,
                ..
            } => f
                .debug_struct("Join")
                .field("local_user_id", local_user_id)
                .field("party_id", party_id)
                .finish_non_exhaustive(),
            Self::Leave {
                local_user_id,
                party_id,
                ..
            } => f
                .debug_struct("Leave")
                .field("local_user_id", local_user_id)
                .field("party_id", party_id)
                .finish_non_exhaustive(),
            Self::Update {
                local_user_id,
                party_id,
                ..
            } => f
                .debug_struct("Update")
                .field("local_user_id", local_user_id)
                .field("party_id", party_id)
                .finish_non_exhaustive(),
            Self::Rejoin {
                local_user_id,
                party_id,
            } => f
                .debug_struct("Rejoin")
                .field("local_user_id", local_user_id)
                .field("party_id", party_id)
                .finish(),
        }
    }
}
