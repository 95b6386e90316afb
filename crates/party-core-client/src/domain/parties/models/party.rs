// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::ops::Deref;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::shared::models::{PartyId, PartyTypeId, RequestId, RoomId, UserId, UserProfile};

use super::{
    JoinSubmission, MemberList, PartyConfiguration, PartyData, PartyMember, PartyState,
};

/// A party as known to one local user. Cheap to clone; the coordinator's
/// cache owns the single copy of the underlying state.
#[derive(Debug, Clone)]
pub struct Party {
    inner: Arc<PartyInner>,
}

/// Identity of a party. Immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct PartyInfo {
    pub party_id: PartyId,
    pub party_type_id: PartyTypeId,
}

/// A join request the leader has not yet decided on.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingJoinRequest {
    pub(crate) request_id: RequestId,
    pub(crate) submission: JoinSubmission,
}

impl PendingJoinRequest {
    pub fn sender(&self) -> &UserProfile {
        &self.submission.joiner
    }
}

#[derive(Debug, Clone)]
struct PartyDetails {
    leader: UserId,
    state: PartyState,
    config: PartyConfiguration,
    room_id: RoomId,
    access_key: Option<String>,
    members: MemberList,
    party_data: PartyData,
    // Leader-side bookkeeping. Meaningless on non-leader mirrors.
    pending_join_requests: Vec<PendingJoinRequest>,
    pending_invited_users: Vec<UserId>,
    promotion_lockout: bool,
}

#[derive(Debug)]
struct PartyInner {
    info: PartyInfo,
    details: RwLock<PartyDetails>,
}

impl Deref for Party {
    type Target = PartyInfo;

    fn deref(&self) -> &Self::Target {
        &self.inner.info
    }
}

impl Party {
    fn new(info: PartyInfo, details: PartyDetails) -> Self {
        Self {
            inner: Arc::new(PartyInner {
                info,
                details: RwLock::new(details),
            }),
        }
    }

    /// A freshly created party: the local user is its leader and only member.
    pub fn active(
        party_id: PartyId,
        party_type_id: PartyTypeId,
        leader: UserProfile,
        config: PartyConfiguration,
        room_id: RoomId,
        access_key: Option<String>,
    ) -> Self {
        let leader_id = leader.id.clone();
        Self::new(
            PartyInfo {
                party_id,
                party_type_id,
            },
            PartyDetails {
                leader: leader_id,
                state: PartyState::Active,
                config,
                room_id,
                access_key,
                members: MemberList::from_iter([PartyMember::new(leader)]),
                party_data: PartyData::new(),
                pending_join_requests: Vec::new(),
                pending_invited_users: Vec::new(),
                promotion_lockout: false,
            },
        )
    }

    /// A party we are in the process of joining. Membership and configuration
    /// arrive with the leader's approval.
    pub fn joining(party_id: PartyId, party_type_id: PartyTypeId, leader: UserId) -> Self {
        Self::new(
            PartyInfo {
                party_id,
                party_type_id,
            },
            PartyDetails {
                leader,
                state: PartyState::JoinPending,
                config: PartyConfiguration::default(),
                room_id: RoomId::default(),
                access_key: None,
                members: MemberList::default(),
                party_data: PartyData::new(),
                pending_join_requests: Vec::new(),
                pending_invited_users: Vec::new(),
                promotion_lockout: false,
            },
        )
    }
}

impl Party {
    pub fn leader(&self) -> UserId {
        self.inner.details.read().leader.clone()
    }

    pub fn set_leader(&self, leader: UserId) {
        self.inner.details.write().leader = leader
    }

    pub fn state(&self) -> PartyState {
        self.inner.details.read().state
    }

    pub fn set_state(&self, state: PartyState) {
        self.inner.details.write().state = state
    }

    pub fn config(&self) -> PartyConfiguration {
        self.inner.details.read().config.clone()
    }

    pub fn set_config(&self, config: PartyConfiguration) {
        self.inner.details.write().config = config
    }

    pub fn room_id(&self) -> RoomId {
        self.inner.details.read().room_id.clone()
    }

    pub fn set_room_id(&self, room_id: RoomId) {
        self.inner.details.write().room_id = room_id
    }

    pub fn access_key(&self) -> Option<String> {
        self.inner.details.read().access_key.clone()
    }

    pub fn set_access_key(&self, access_key: Option<String>) {
        self.inner.details.write().access_key = access_key
    }

    pub fn party_data(&self) -> PartyData {
        self.inner.details.read().party_data.clone()
    }

    pub fn set_party_data(&self, data: PartyData) {
        self.inner.details.write().party_data = data
    }

    pub fn with_members<T>(&self, f: impl FnOnce(&MemberList) -> T) -> T {
        f(&self.inner.details.read().members)
    }

    pub fn with_members_mut<T>(&self, f: impl FnOnce(&mut MemberList) -> T) -> T {
        f(&mut self.inner.details.write().members)
    }

    pub fn member_count(&self) -> usize {
        self.inner.details.read().members.len()
    }

    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.inner.details.read().members.contains(user_id)
    }

    pub fn is_leader(&self, user_id: &UserId) -> bool {
        let details = self.inner.details.read();
        details.leader == *user_id && details.members.contains(user_id)
    }
}

impl Party {
    pub(crate) fn push_join_request(&self, request: PendingJoinRequest) {
        self.inner.details.write().pending_join_requests.push(request)
    }

    pub(crate) fn take_join_request(&self, sender_id: &UserId) -> Option<PendingJoinRequest> {
        let mut details = self.inner.details.write();
        let index = details
            .pending_join_requests
            .iter()
            .position(|request| request.sender().id == *sender_id)?;
        Some(details.pending_join_requests.remove(index))
    }

    pub(crate) fn take_all_join_requests(&self) -> Vec<PendingJoinRequest> {
        std::mem::take(&mut self.inner.details.write().pending_join_requests)
    }

    pub fn pending_join_requests(&self) -> Vec<PendingJoinRequest> {
        self.inner.details.read().pending_join_requests.clone()
    }

    pub fn has_pending_join_requests(&self) -> bool {
        !self.inner.details.read().pending_join_requests.is_empty()
    }

    pub(crate) fn add_invited_user(&self, user_id: UserId) -> bool {
        let mut details = self.inner.details.write();
        if details.pending_invited_users.contains(&user_id) {
            return false;
        }
        details.pending_invited_users.push(user_id);
        true
    }

    pub(crate) fn remove_invited_user(&self, user_id: &UserId) -> bool {
        let mut details = self.inner.details.write();
        let Some(index) = details
            .pending_invited_users
            .iter()
            .position(|id| id == user_id)
        else {
            return false;
        };
        details.pending_invited_users.remove(index);
        true
    }

    pub fn pending_invited_users(&self) -> Vec<UserId> {
        self.inner.details.read().pending_invited_users.clone()
    }

    pub fn is_invited_user(&self, user_id: &UserId) -> bool {
        self.inner.details.read().pending_invited_users.contains(user_id)
    }

    pub fn promotion_lockout(&self) -> bool {
        self.inner.details.read().promotion_lockout
    }

    /// Sets the lockout flag. Returns `true` if the flag changed, which is
    /// when the coordinator raises a notification.
    pub(crate) fn set_promotion_lockout(&self, lockout: bool) -> bool {
        let mut details = self.inner.details.write();
        if details.promotion_lockout == lockout {
            return false;
        }
        details.promotion_lockout = lockout;
        true
    }
}

impl Party {
    /// True if the given member may send invitations under the current
    /// configuration. The friend graph lives outside the party system, so
    /// `Friends` admits any current member here; the presence layer narrows
    /// the audience.
    pub fn can_user_invite(&self, user_id: &UserId) -> bool {
        use super::InvitePermissions::*;

        let details = self.inner.details.read();
        if !details.members.contains(user_id) {
            return false;
        }
        match details.config.invite_permissions {
            Leader => details.leader == *user_id,
            Friends | Anyone => true,
        }
    }

    pub fn is_joinable(&self) -> bool {
        let details = self.inner.details.read();
        details.state == PartyState::Active
            && details.config.is_accepting_members
            && details.config.has_space_for_member(details.members.len())
    }
}
