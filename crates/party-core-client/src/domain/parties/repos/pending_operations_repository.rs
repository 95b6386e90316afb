// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::domain::parties::models::PendingOperation;
use crate::domain::shared::models::{PartyId, PartyTypeId, RequestId, UserId};

/// In-flight operations keyed by request id. Taking an operation out is the
/// only way to resolve it, which makes the at-most-once callback contract a
/// structural property rather than a convention.
#[derive(Default)]
pub struct PendingOperationsRepository {
    operations: Mutex<HashMap<RequestId, PendingOperation>>,
}

impl PendingOperationsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, request_id: RequestId, operation: PendingOperation) {
        self.operations.lock().insert(request_id, operation);
    }

    pub fn take(&self, request_id: &RequestId) -> Option<PendingOperation> {
        self.operations.lock().remove(request_id)
    }

    /// Removes and returns every operation concerning the given party, e.g.
    /// when the party is cleaned up and the operations must resolve with a
    /// failure.
    pub fn take_for_party(
        &self,
        local_user_id: &UserId,
        party_id: &PartyId,
    ) -> Vec<PendingOperation> {
        let mut operations = self.operations.lock();
        let request_ids = operations
            .iter()
            .filter(|(_, op)| op.concerns(local_user_id, party_id))
            .map(|(request_id, _)| request_id.clone())
            .collect::<Vec<_>>();
        request_ids
            .into_iter()
            .filter_map(|request_id| operations.remove(&request_id))
            .collect()
    }

    pub fn has_pending_create(&self, local_user_id: &UserId, party_type_id: &PartyTypeId) -> bool {
        self.operations.lock().values().any(|op| match op {
            PendingOperation::Create {
                local_user_id: user,
                party_type_id: type_id,
                ..
            } => user == local_user_id && type_id == party_type_id,
            _ => false,
        })
    }
}
