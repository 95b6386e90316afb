// party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use pretty_assertions::assert_eq;

use party_core_client::dtos::{DataValue, PartyData, PartyId, UserId};
use party_core_client::ClientEvent;

use super::helpers::{auto_approve_config, create_party, join_via_presence, TestEnvironment};

#[test]
fn test_party_data_broadcast_is_last_write_wins() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let (bob_client, bob_events) = env.client("bob", "Bob");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));
    join_via_presence(&bob_client, &bob, &alice);

    let mut first = PartyData::new();
    first.set("mode", "duos");
    first.set("map", "alpha");
    assert!(alice_client
        .parties
        .update_party_data(&alice, &party_id, first));

    let mut second = PartyData::new();
    second.set("mode", "trios");
    assert!(alice_client
        .parties
        .update_party_data(&alice, &party_id, second.clone()));

    // Only the last write is visible anywhere; no history survives.
    assert_eq!(
        alice_client.parties.party_data(&alice, &party_id),
        Some(second.clone())
    );
    assert_eq!(
        bob_client.parties.party_data(&bob, &party_id),
        Some(second.clone())
    );
    assert_eq!(
        bob_client
            .parties
            .party_data(&bob, &party_id)
            .and_then(|data| data.get("map").cloned()),
        None
    );
    assert!(bob_events.contains(&ClientEvent::PartyDataReceived {
        local_user_id: bob.clone(),
        party_id: party_id.clone(),
        data: second,
    }));
}

#[test]
fn test_member_data_broadcast() {
    let env = TestEnvironment::new();
    let (alice_client, alice_events) = env.client("alice", "Alice");
    let (bob_client, _) = env.client("bob", "Bob");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));
    join_via_presence(&bob_client, &bob, &alice);

    let mut data = PartyData::new();
    data.set("status", "ready");
    data.set("level", 99i64);
    assert!(bob_client
        .parties
        .update_party_member_data(&bob, &party_id, data.clone()));

    assert_eq!(
        alice_client.parties.party_member_data(&alice, &party_id, &bob),
        Some(data.clone())
    );
    assert_eq!(
        alice_client
            .parties
            .party_member_data(&alice, &party_id, &bob)
            .and_then(|data| data.get("level").cloned()),
        Some(DataValue::I64(99))
    );
    assert!(alice_events.contains(&ClientEvent::PartyMemberDataReceived {
        local_user_id: alice.clone(),
        party_id: party_id.clone(),
        member_id: bob.clone(),
        data,
    }));
}

#[test]
fn test_data_queries_report_absence_as_none() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let alice = UserId::from("alice");
    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));

    assert_eq!(
        alice_client
            .parties
            .party_data(&alice, &PartyId::from("no-such-party")),
        None
    );
    assert_eq!(
        alice_client
            .parties
            .party_member_data(&alice, &party_id, &UserId::from("stranger")),
        None
    );
    assert_eq!(
        alice_client
            .parties
            .party_data(&alice, &party_id)
            .map(|data| data.is_empty()),
        Some(true)
    );
}

#[test]
fn test_non_member_cannot_update_party_data() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let (bob_client, _) = env.client("bob", "Bob");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));

    // Bob never joined; his client has no such party.
    assert!(!bob_client
        .parties
        .update_party_data(&bob, &party_id, PartyData::new()));
    assert!(!bob_client
        .parties
        .update_party_member_data(&bob, &party_id, PartyData::new()));
}
