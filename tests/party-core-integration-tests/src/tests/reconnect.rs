// party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use pretty_assertions::assert_eq;

use party_core_client::dtos::{
    JoinPartyCompletionResult, MemberChangedReason, MemberExitedReason, PartyConfiguration,
    PartyData, PartyState, UserId,
};
use party_core_client::test::ResultSlot;
use party_core_client::{ClientEvent, PartyPush, ServerEvent};

use super::helpers::{auto_approve_config, create_party, join_via_presence, TestEnvironment};

#[test]
fn test_member_reconnects_and_resyncs() {
    let env = TestEnvironment::new();
    let (alice_client, alice_events) = env.client("alice", "Alice");
    let (bob_client, _) = env.client("bob", "Bob");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));
    join_via_presence(&bob_client, &bob, &alice);

    // The presence side reports bob as gone.
    alice_client.handle_server_event(
        &alice,
        ServerEvent::Push {
            sender: alice.clone(),
            push: PartyPush::MemberDisconnected {
                party_id: party_id.clone(),
                member_id: bob.clone(),
            },
        },
    );
    assert!(alice_events.contains(&ClientEvent::PartyMemberChanged {
        local_user_id: alice.clone(),
        party_id: party_id.clone(),
        member_id: bob.clone(),
        reason: MemberChangedReason::Disconnected,
    }));

    env.relay.disconnect_user(&bob);
    assert_eq!(
        bob_client.parties.party(&bob, &party_id).map(|p| p.state()),
        Some(PartyState::Disconnected)
    );

    // Party data moves on while bob is away.
    let mut data = PartyData::new();
    data.set("round", 2i64);
    alice_client
        .parties
        .update_party_data(&alice, &party_id, data.clone());

    env.relay.reconnect_user(&bob);

    assert_eq!(
        bob_client.parties.party(&bob, &party_id).map(|p| p.state()),
        Some(PartyState::Active)
    );
    assert_eq!(bob_client.parties.party_data(&bob, &party_id), Some(data));
    assert!(alice_events.contains(&ClientEvent::PartyMemberChanged {
        local_user_id: alice.clone(),
        party_id: party_id.clone(),
        member_id: bob.clone(),
        reason: MemberChangedReason::Rejoined,
    }));
}

#[test]
fn test_remove_on_disconnection_cleans_up_locally() {
    let env = TestEnvironment::new();
    let (alice_client, alice_events) = env.client("alice", "Alice");
    let alice = UserId::from("alice");

    let config = PartyConfiguration {
        should_remove_on_disconnection: true,
        ..auto_approve_config(0)
    };
    let party_id = create_party(&alice_client, &alice, config);

    env.relay.disconnect_user(&alice);

    assert!(alice_client.parties.joined_parties(&alice).is_empty());
    assert!(alice_events.contains(&ClientEvent::PartyExited {
        local_user_id: alice.clone(),
        party_id: party_id.clone(),
    }));
}

#[test]
fn test_leader_stays_authoritative_across_its_own_reconnect() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let alice = UserId::from("alice");

    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));

    env.relay.disconnect_user(&alice);
    assert_eq!(
        alice_client.parties.party(&alice, &party_id).map(|p| p.state()),
        Some(PartyState::Disconnected)
    );

    env.relay.reconnect_user(&alice);
    assert_eq!(
        alice_client.parties.party(&alice, &party_id).map(|p| p.state()),
        Some(PartyState::Active)
    );
}

#[test]
fn test_pending_join_resolves_when_the_party_is_cleaned_up() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let (bob_client, bob_events) = env.client("bob", "Bob");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    // Manual joins keep bob's request parked on the leader.
    let config = PartyConfiguration {
        is_accepting_members: true,
        ..Default::default()
    };
    let party_id = create_party(&alice_client, &alice, config);
    let join_info = bob_client
        .parties
        .advertised_party(&bob, &alice, &party_core_client::dtos::PartyTypeId::primary())
        .expect("no advertised party");

    let slot = ResultSlot::new();
    let slot_in_callback = slot.clone();
    assert!(bob_client
        .parties
        .join_party(&bob, &join_info, move |_, _, result, _| {
            slot_in_callback.set(result)
        }));
    assert!(!slot.is_set());

    // The party disappears out from under the pending join; the callback
    // still fires, exactly once, with a failure.
    bob_client.handle_server_event(
        &bob,
        ServerEvent::Push {
            sender: alice.clone(),
            push: PartyPush::MemberExited {
                party_id: party_id.clone(),
                member_id: bob.clone(),
                reason: MemberExitedReason::Removed,
            },
        },
    );

    assert_eq!(
        slot.take(),
        Some(JoinPartyCompletionResult::UnknownClientFailure)
    );
    assert!(bob_client.parties.party(&bob, &party_id).is_none());
    assert!(bob_events.contains(&ClientEvent::PartyExited {
        local_user_id: bob.clone(),
        party_id: party_id.clone(),
    }));
}
