// party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;

use parking_lot::Mutex;

use party_core_client::dtos::{
    CreatePartyCompletionResult, JoinPartyCompletionResult, JoinRequestAction, PartyConfiguration,
    PartyId, PartyJoinInfo, PartyTypeId, RequestId, UserId, UserProfile,
};
use party_core_client::infra::presence::InMemoryPartyPresenceService;
use party_core_client::infra::transport::LocalRelay;
use party_core_client::test::{CollectedEvents, ResultSlot};
use party_core_client::{
    Client, ClientInfo, PartyRequest, PartyTransport, Recipient, TransportError,
};

/// One relay plus one presence board shared by every client of a test.
pub struct TestEnvironment {
    pub relay: LocalRelay,
    pub presence: InMemoryPartyPresenceService,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            relay: LocalRelay::new(),
            presence: InMemoryPartyPresenceService::new(),
        }
    }

    /// Builds a client for `user`, registers it with the relay and returns
    /// it together with its recorded events.
    pub fn client(&self, user: &str, display_name: &str) -> (Client, CollectedEvents) {
        let events = CollectedEvents::new();
        let client = Client::builder()
            .set_transport(Arc::new(self.relay.clone()))
            .set_presence_service(Arc::new(self.presence.clone()))
            .set_client_info(ClientInfo {
                app_id: "game".to_string(),
                build_id: "1.0.0".to_string(),
            })
            .add_delegate(Arc::new(events.clone()))
            .build();
        client.register_local_user(UserProfile::new(user, display_name));
        self.relay.register_client(&UserId::from(user), &client);
        (client, events)
    }
}

/// An accepting party that admits joiners without leader interaction.
pub fn auto_approve_config(max_members: u32) -> PartyConfiguration {
    PartyConfiguration {
        join_request_action: JoinRequestAction::AutoApprove,
        is_accepting_members: true,
        max_members,
        ..Default::default()
    }
}

/// Creates a party through the full request cycle and returns its id.
pub fn create_party(client: &Client, user: &UserId, config: PartyConfiguration) -> PartyId {
    let slot = ResultSlot::new();
    let slot_in_callback = slot.clone();
    let accepted = client.parties.create_party(
        user,
        PartyTypeId::primary(),
        config,
        move |_, party_id, result| slot_in_callback.set((party_id.cloned(), result)),
    );
    assert!(accepted, "create_party was rejected synchronously");

    let (party_id, result) = slot.take().expect("create_party did not complete");
    assert_eq!(result, CreatePartyCompletionResult::Succeeded);
    party_id.expect("party id missing from create result")
}

/// Joins `user` into the party advertised by `advertiser` and returns the
/// completion result.
pub fn join_via_presence(
    client: &Client,
    user: &UserId,
    advertiser: &UserId,
) -> JoinPartyCompletionResult {
    let join_info = client
        .parties
        .advertised_party(user, advertiser, &PartyTypeId::primary())
        .expect("no advertised party");
    join(client, user, &join_info)
}

pub fn join(client: &Client, user: &UserId, join_info: &PartyJoinInfo) -> JoinPartyCompletionResult {
    let slot = ResultSlot::new();
    let slot_in_callback = slot.clone();
    let accepted = client
        .parties
        .join_party(user, join_info, move |_, _, result, _| {
            slot_in_callback.set(result)
        });
    assert!(accepted, "join_party was rejected synchronously");
    slot.take().expect("join_party did not complete")
}

/// A transport that records requests without ever answering them. Lets
/// tests hold operations in their pending state and answer by hand.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<(Recipient, RequestId, PartyRequest)>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<(Recipient, RequestId, PartyRequest)> {
        self.requests.lock().clone()
    }
}

impl PartyTransport for RecordingTransport {
    fn send_request(
        &self,
        _sender: &UserId,
        recipient: &Recipient,
        request_id: &RequestId,
        request: PartyRequest,
    ) -> Result<(), TransportError> {
        self.requests
            .lock()
            .push((recipient.clone(), request_id.clone(), request));
        Ok(())
    }

    fn respond(
        &self,
        _sender: &UserId,
        _recipient: &UserId,
        _request_id: &RequestId,
        _response: party_core_client::PartyResponse,
    ) -> Result<(), TransportError> {
        Ok(())
    }

    fn push(
        &self,
        _sender: &UserId,
        _recipient: &UserId,
        _push: party_core_client::PartyPush,
    ) -> Result<(), TransportError> {
        Ok(())
    }
}
