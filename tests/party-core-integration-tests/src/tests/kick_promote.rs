// party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use pretty_assertions::assert_eq;

use party_core_client::dtos::{
    KickMemberCompletionResult, MemberChangedReason, PartyConfiguration,
    PromoteMemberCompletionResult, UserId,
};
use party_core_client::test::ResultSlot;
use party_core_client::ClientEvent;

use super::helpers::{auto_approve_config, create_party, join_via_presence, TestEnvironment};

#[test]
fn test_promotion_reassigns_the_leader() {
    let env = TestEnvironment::new();
    let (alice_client, alice_events) = env.client("alice", "Alice");
    let (bob_client, bob_events) = env.client("bob", "Bob");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));
    join_via_presence(&bob_client, &bob, &alice);

    let slot = ResultSlot::new();
    let slot_in_callback = slot.clone();
    assert!(alice_client
        .parties
        .promote_member(&alice, &party_id, &bob, move |_, _, _, result| {
            slot_in_callback.set(result)
        }));
    assert_eq!(slot.take(), Some(PromoteMemberCompletionResult::Succeeded));

    for (events, user) in [(&alice_events, &alice), (&bob_events, &bob)] {
        assert!(events.contains(&ClientEvent::PartyMemberChanged {
            local_user_id: user.clone(),
            party_id: party_id.clone(),
            member_id: bob.clone(),
            reason: MemberChangedReason::Promoted,
        }));
    }

    // Both caches agree on the new leader, and only the new leader.
    assert!(alice_client.parties.is_member_leader(&alice, &party_id, &bob));
    assert!(!alice_client.parties.is_member_leader(&alice, &party_id, &alice));
    assert!(bob_client.parties.is_member_leader(&bob, &party_id, &bob));
    assert!(!bob_client.parties.is_member_leader(&bob, &party_id, &alice));
}

#[test]
fn test_ex_leader_cannot_kick() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let (bob_client, _) = env.client("bob", "Bob");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));
    join_via_presence(&bob_client, &bob, &alice);

    alice_client
        .parties
        .promote_member(&alice, &party_id, &bob, |_, _, _, _| {});

    // The demoted leader's kick is rejected outright.
    let accepted = alice_client.parties.kick_member(
        &alice,
        &party_id,
        &bob,
        |_, _, _, _| panic!("rejected kick must not fire its callback"),
    );
    assert!(!accepted);

    // The new leader's kick goes through.
    let slot = ResultSlot::new();
    let slot_in_callback = slot.clone();
    assert!(bob_client
        .parties
        .kick_member(&bob, &party_id, &alice, move |_, _, _, result| {
            slot_in_callback.set(result)
        }));
    assert_eq!(slot.take(), Some(KickMemberCompletionResult::Succeeded));
    assert!(alice_client.parties.joined_parties(&alice).is_empty());
}

#[test]
fn test_kick_preconditions() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let alice = UserId::from("alice");
    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));

    // Unknown target.
    assert!(!alice_client.parties.kick_member(
        &alice,
        &party_id,
        &UserId::from("stranger"),
        |_, _, _, _| panic!("rejected kick must not fire its callback"),
    ));
    // Kicking yourself is not a thing.
    assert!(!alice_client.parties.kick_member(
        &alice,
        &party_id,
        &alice,
        |_, _, _, _| panic!("rejected kick must not fire its callback"),
    ));
}

#[test]
fn test_promote_preconditions() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let alice = UserId::from("alice");
    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));

    assert!(!alice_client.parties.promote_member(
        &alice,
        &party_id,
        &alice,
        |_, _, _, _| panic!("rejected promote must not fire its callback"),
    ));
    assert!(!alice_client.parties.promote_member(
        &alice,
        &party_id,
        &UserId::from("stranger"),
        |_, _, _, _| panic!("rejected promote must not fire its callback"),
    ));
}

#[test]
fn test_promotion_is_locked_while_join_requests_are_pending() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let (bob_client, _) = env.client("bob", "Bob");
    let (carol_client, _) = env.client("carol", "Carol");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");
    let carol = UserId::from("carol");

    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));
    join_via_presence(&bob_client, &bob, &alice);

    // Flip to manual joins, then let a request queue up.
    let config = PartyConfiguration {
        is_accepting_members: true,
        ..Default::default()
    };
    alice_client
        .parties
        .update_party(&alice, &party_id, config, false, |_, _, _| {});

    assert!(carol_client
        .parties
        .join_party(&carol, &alice_client.parties.make_join_info(&alice, &party_id).unwrap(), |_, _, _, _| {}));

    assert!(alice_client.parties.party(&alice, &party_id).unwrap().promotion_lockout());
    assert!(!alice_client.parties.promote_member(
        &alice,
        &party_id,
        &bob,
        |_, _, _, _| panic!("locked-out promote must not fire its callback"),
    ));

    // Draining the queue unlocks promotion again.
    alice_client
        .parties
        .approve_join_request(&alice, &party_id, &carol, true, 0);
    assert!(!alice_client.parties.party(&alice, &party_id).unwrap().promotion_lockout());
    assert!(alice_client
        .parties
        .promote_member(&alice, &party_id, &bob, |_, _, _, _| {}));
}
