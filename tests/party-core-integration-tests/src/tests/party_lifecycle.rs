// party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;

use pretty_assertions::assert_eq;

use party_core_client::dtos::{
    CreatePartyCompletionResult, JoinPartyCompletionResult, LeavePartyCompletionResult,
    PartyConfiguration, PartyId, PartyState, PartyTypeId, UserId,
};
use party_core_client::test::ResultSlot;
use party_core_client::{
    Client, ClientEvent, IncrementingIDProvider, PartyResponse, Recipient, ServerEvent,
};

use super::helpers::{auto_approve_config, create_party, join_via_presence, RecordingTransport, TestEnvironment};

#[test]
fn test_create_party() {
    let env = TestEnvironment::new();
    let (alice_client, alice_events) = env.client("alice", "Alice");
    let alice = UserId::from("alice");

    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));

    assert!(alice_events.contains(&ClientEvent::PartyJoined {
        local_user_id: alice.clone(),
        party_id: party_id.clone(),
    }));
    assert_eq!(alice_client.parties.joined_parties(&alice), vec![party_id.clone()]);
    assert!(alice_client.parties.is_member_leader(&alice, &party_id, &alice));
    assert_eq!(alice_client.parties.party_member_count(&alice, &party_id), 1);
    assert_eq!(
        alice_client
            .parties
            .party(&alice, &party_id)
            .map(|party| party.state()),
        Some(PartyState::Active)
    );
}

#[test]
fn test_create_rejected_while_in_party_of_same_type() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let alice = UserId::from("alice");

    create_party(&alice_client, &alice, auto_approve_config(0));

    let accepted = alice_client.parties.create_party(
        &alice,
        PartyTypeId::primary(),
        PartyConfiguration::default(),
        |_, _, _| panic!("rejected operation must not fire its callback"),
    );
    assert!(!accepted);
}

#[test]
fn test_create_rejected_while_create_is_pending() {
    // A transport that never answers keeps the first create in flight.
    let transport = RecordingTransport::new();
    let completions = ResultSlot::new();
    let completions_in_callback = completions.clone();

    let client = Client::builder()
        .set_transport(Arc::new(transport.clone()))
        .set_id_provider(Arc::new(IncrementingIDProvider::new()))
        .build();
    let alice = UserId::from("alice");
    client.register_local_user(party_core_client::dtos::UserProfile::new("alice", "Alice"));

    let accepted = client.parties.create_party(
        &alice,
        PartyTypeId::primary(),
        PartyConfiguration::default(),
        move |_, party_id, result| completions_in_callback.set((party_id.cloned(), result)),
    );
    assert!(accepted);

    let accepted = client.parties.create_party(
        &alice,
        PartyTypeId::primary(),
        PartyConfiguration::default(),
        |_, _, _| panic!("second create must not fire a callback"),
    );
    assert!(!accepted);
    assert!(!completions.is_set());

    // Answer the first request by hand; exactly one completion fires.
    let (recipient, request_id, _) = transport.requests().remove(0);
    assert_eq!(recipient, Recipient::Service);
    client.handle_server_event(
        &alice,
        ServerEvent::Response {
            request_id,
            payload: PartyResponse::Created {
                party_id: PartyId::from("party-1"),
                room_id: "room-1".into(),
                access_key: "key-1".to_string(),
            },
        },
    );

    let (party_id, result) = completions.take().expect("first create never completed");
    assert_eq!(result, CreatePartyCompletionResult::Succeeded);
    assert_eq!(party_id, Some(PartyId::from("party-1")));
}

#[test]
fn test_join_via_presence_advertisement() {
    let env = TestEnvironment::new();
    let (alice_client, alice_events) = env.client("alice", "Alice");
    let (bob_client, bob_events) = env.client("bob", "Bob");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));

    assert_eq!(join_via_presence(&bob_client, &bob, &alice), JoinPartyCompletionResult::Succeeded);

    assert!(bob_events.contains(&ClientEvent::PartyJoined {
        local_user_id: bob.clone(),
        party_id: party_id.clone(),
    }));
    assert!(alice_events.contains(&ClientEvent::PartyMemberJoined {
        local_user_id: alice.clone(),
        party_id: party_id.clone(),
        member_id: bob.clone(),
    }));
    assert_eq!(alice_client.parties.party_member_count(&alice, &party_id), 2);
    assert_eq!(bob_client.parties.party_member_count(&bob, &party_id), 2);
    assert!(bob_client.parties.is_member_leader(&bob, &party_id, &alice));
}

#[test]
fn test_capacity_is_enforced() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let (bob_client, _) = env.client("bob", "Bob");
    let (carol_client, _) = env.client("carol", "Carol");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");
    let carol = UserId::from("carol");

    let party_id = create_party(&alice_client, &alice, auto_approve_config(2));

    assert_eq!(join_via_presence(&bob_client, &bob, &alice), JoinPartyCompletionResult::Succeeded);
    assert_eq!(join_via_presence(&carol_client, &carol, &alice), JoinPartyCompletionResult::NoSpace);

    assert_eq!(alice_client.parties.party_member_count(&alice, &party_id), 2);
    // The denied joiner keeps no trace of the party.
    assert!(carol_client.parties.party(&carol, &party_id).is_none());
    assert!(carol_client.parties.joined_parties(&carol).is_empty());
}

#[test]
fn test_zero_max_members_is_unbounded() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let alice = UserId::from("alice");
    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));

    for name in ["bob", "carol", "dave", "erin"] {
        let (client, _) = env.client(name, name);
        let user = UserId::from(name);
        assert_eq!(
            join_via_presence(&client, &user, &alice),
            JoinPartyCompletionResult::Succeeded
        );
    }

    assert_eq!(alice_client.parties.party_member_count(&alice, &party_id), 5);
}

#[test]
fn test_member_leaves_party() {
    let env = TestEnvironment::new();
    let (alice_client, alice_events) = env.client("alice", "Alice");
    let (bob_client, bob_events) = env.client("bob", "Bob");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));
    join_via_presence(&bob_client, &bob, &alice);

    let slot = ResultSlot::new();
    let slot_in_callback = slot.clone();
    assert!(bob_client
        .parties
        .leave_party(&bob, &party_id, move |_, _, result| slot_in_callback.set(result)));
    assert_eq!(slot.take(), Some(LeavePartyCompletionResult::Succeeded));

    assert!(bob_events.contains(&ClientEvent::PartyExited {
        local_user_id: bob.clone(),
        party_id: party_id.clone(),
    }));
    assert!(alice_events.contains(&ClientEvent::PartyMemberExited {
        local_user_id: alice.clone(),
        party_id: party_id.clone(),
        member_id: bob.clone(),
        reason: party_core_client::dtos::MemberExitedReason::Left,
    }));
    assert!(bob_client.parties.joined_parties(&bob).is_empty());
    assert_eq!(alice_client.parties.party_member_count(&alice, &party_id), 1);
}

#[test]
fn test_leaving_leader_hands_over_the_party() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let (bob_client, bob_events) = env.client("bob", "Bob");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));
    join_via_presence(&bob_client, &bob, &alice);

    let slot = ResultSlot::new();
    let slot_in_callback = slot.clone();
    assert!(alice_client
        .parties
        .leave_party(&alice, &party_id, move |_, _, result| {
            slot_in_callback.set(result)
        }));
    assert_eq!(slot.take(), Some(LeavePartyCompletionResult::Succeeded));

    assert!(bob_events.contains(&ClientEvent::PartyMemberChanged {
        local_user_id: bob.clone(),
        party_id: party_id.clone(),
        member_id: bob.clone(),
        reason: party_core_client::dtos::MemberChangedReason::Promoted,
    }));
    assert!(bob_client.parties.is_member_leader(&bob, &party_id, &bob));
    assert_eq!(bob_client.parties.party_member_count(&bob, &party_id), 1);
    assert!(alice_client.parties.joined_parties(&alice).is_empty());
}

#[test]
fn test_join_times_out_when_leader_is_unreachable() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let (bob_client, _) = env.client("bob", "Bob");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));
    let join_info = bob_client
        .parties
        .advertised_party(&bob, &alice, &PartyTypeId::primary())
        .expect("no advertised party");

    env.relay.set_reachable(&alice, false);

    assert_eq!(
        super::helpers::join(&bob_client, &bob, &join_info),
        JoinPartyCompletionResult::NoResponse
    );
    assert!(bob_client.parties.party(&bob, &party_id).is_none());
}

#[test]
fn test_manual_join_requests_wait_for_the_leader() {
    let env = TestEnvironment::new();
    let (alice_client, alice_events) = env.client("alice", "Alice");
    let (bob_client, bob_events) = env.client("bob", "Bob");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let config = PartyConfiguration {
        is_accepting_members: true,
        ..Default::default()
    };
    let party_id = create_party(&alice_client, &alice, config);

    let join_info = bob_client
        .parties
        .advertised_party(&bob, &alice, &PartyTypeId::primary())
        .expect("no advertised party");

    let slot = ResultSlot::new();
    let slot_in_callback = slot.clone();
    assert!(bob_client
        .parties
        .join_party(&bob, &join_info, move |_, _, result, reason| {
            slot_in_callback.set((result, reason))
        }));

    // The leader saw the request, the joiner is still waiting.
    assert!(!slot.is_set());
    assert!(alice_events.contains(&ClientEvent::PartyJoinRequestReceived {
        local_user_id: alice.clone(),
        party_id: party_id.clone(),
        sender_id: bob.clone(),
    }));
    assert!(alice_events.contains(&ClientEvent::PartyPromotionLockoutChanged {
        local_user_id: alice.clone(),
        party_id: party_id.clone(),
        lockout: true,
    }));
    assert_eq!(
        alice_client
            .parties
            .pending_join_requests(&alice, &party_id)
            .iter()
            .map(|profile| profile.id.clone())
            .collect::<Vec<_>>(),
        vec![bob.clone()]
    );

    assert!(alice_client
        .parties
        .approve_join_request(&alice, &party_id, &bob, true, 0));

    assert_eq!(slot.take(), Some((JoinPartyCompletionResult::Succeeded, 0)));
    assert!(bob_events.contains(&ClientEvent::PartyJoined {
        local_user_id: bob.clone(),
        party_id: party_id.clone(),
    }));
    assert!(alice_events.contains(&ClientEvent::PartyPromotionLockoutChanged {
        local_user_id: alice.clone(),
        party_id: party_id.clone(),
        lockout: false,
    }));
    assert!(alice_client
        .parties
        .pending_join_requests(&alice, &party_id)
        .is_empty());
}

#[test]
fn test_denied_join_request_carries_the_reason_code() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let (bob_client, _) = env.client("bob", "Bob");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let config = PartyConfiguration {
        is_accepting_members: true,
        ..Default::default()
    };
    let party_id = create_party(&alice_client, &alice, config);

    let join_info = bob_client
        .parties
        .advertised_party(&bob, &alice, &PartyTypeId::primary())
        .expect("no advertised party");

    let slot = ResultSlot::new();
    let slot_in_callback = slot.clone();
    assert!(bob_client
        .parties
        .join_party(&bob, &join_info, move |_, _, result, reason| {
            slot_in_callback.set((result, reason))
        }));

    assert!(alice_client
        .parties
        .approve_join_request(&alice, &party_id, &bob, false, 42));

    assert_eq!(
        slot.take(),
        Some((JoinPartyCompletionResult::NotApproved, 42))
    );
    assert!(bob_client.parties.party(&bob, &party_id).is_none());
}

#[test]
fn test_command_line_invite_is_consumed_once() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let alice = UserId::from("alice");
    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));

    let token = alice_client
        .parties
        .make_join_info(&alice, &party_id)
        .map(|join_info| alice_client.parties.token_from_join_info(&join_info))
        .expect("no join info for own party");

    let bob_client = Client::builder()
        .set_transport(Arc::new(RecordingTransport::new()))
        .set_command_line_invite_token(token)
        .build();

    let invite = bob_client
        .parties
        .consume_pending_command_line_invite()
        .expect("command-line invite missing");
    assert_eq!(invite.party_id(), &party_id);
    assert_eq!(invite.leader().id, alice);
    assert!(bob_client
        .parties
        .consume_pending_command_line_invite()
        .is_none());
}

#[test]
fn test_update_party_replaces_the_configuration() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let (bob_client, bob_events) = env.client("bob", "Bob");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));
    join_via_presence(&bob_client, &bob, &alice);

    let old_key = alice_client
        .parties
        .party(&alice, &party_id)
        .and_then(|party| party.access_key());

    let mut new_config = auto_approve_config(8);
    new_config.nickname = "Raid night".to_string();

    let slot = ResultSlot::new();
    let slot_in_callback = slot.clone();
    assert!(alice_client.parties.update_party(
        &alice,
        &party_id,
        new_config.clone(),
        true,
        move |_, _, result| slot_in_callback.set(result),
    ));
    assert_eq!(
        slot.take(),
        Some(party_core_client::dtos::UpdateConfigCompletionResult::Succeeded)
    );

    // Both sides see the replaced config and the rotated key.
    assert_eq!(
        alice_client
            .parties
            .party(&alice, &party_id)
            .map(|party| party.config()),
        Some(new_config.clone())
    );
    assert!(bob_events.contains(&ClientEvent::PartyConfigChanged {
        local_user_id: bob.clone(),
        party_id: party_id.clone(),
        config: new_config.clone(),
    }));
    assert_eq!(
        bob_client
            .parties
            .party(&bob, &party_id)
            .map(|party| party.config()),
        Some(new_config)
    );
    let new_key = alice_client
        .parties
        .party(&alice, &party_id)
        .and_then(|party| party.access_key());
    assert_ne!(old_key, new_key);
    assert!(new_key.is_some());
}
