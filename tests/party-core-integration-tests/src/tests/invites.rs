// party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use pretty_assertions::assert_eq;

use party_core_client::dtos::{
    InvitationResponse, JoinPartyCompletionResult, KickMemberCompletionResult,
    MemberExitedReason, PartyConfiguration, PartyData,
    SendPartyInvitationCompletionResult, RequestPartyInvitationCompletionResult, UserId,
};
use party_core_client::test::ResultSlot;
use party_core_client::ClientEvent;

use super::helpers::{auto_approve_config, create_party, join, join_via_presence, TestEnvironment};

#[test]
fn test_invite_accept_join_kick() {
    let env = TestEnvironment::new();
    let (alice_client, alice_events) = env.client("alice", "Alice");
    let (bob_client, bob_events) = env.client("bob", "Bob");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    // A closed party: not accepting members, manual joins. Invitations are
    // the only way in.
    let party_id = create_party(&alice_client, &alice, PartyConfiguration::default());

    let slot = ResultSlot::new();
    let slot_in_callback = slot.clone();
    assert!(alice_client.invites.send_invitation(
        &alice,
        &party_id,
        &bob,
        PartyData::new(),
        move |_, _, _, result| slot_in_callback.set(result),
    ));
    assert_eq!(slot.take(), Some(SendPartyInvitationCompletionResult::Succeeded));

    assert!(bob_events.contains(&ClientEvent::PartyInviteReceived {
        local_user_id: bob.clone(),
        party_id: party_id.clone(),
        sender_id: alice.clone(),
    }));
    assert!(bob_events.contains(&ClientEvent::PartyInvitesChanged {
        local_user_id: bob.clone(),
    }));
    assert_eq!(
        alice_client.parties.pending_invited_users(&alice, &party_id),
        vec![bob.clone()]
    );

    let invites = bob_client.invites.pending_invites(&bob);
    assert_eq!(invites.len(), 1);
    let join_info = invites[0].join_info.clone();

    assert!(bob_client.invites.accept_invitation(&bob, &alice));
    assert!(alice_events.contains(&ClientEvent::PartyInviteResponseReceived {
        local_user_id: alice.clone(),
        party_id: party_id.clone(),
        sender_id: bob.clone(),
        response: InvitationResponse::Accepted,
    }));
    assert!(bob_client.invites.pending_invites(&bob).is_empty());

    // Accepting didn't join; the invite's join info does, bypassing the
    // closed configuration.
    assert_eq!(join(&bob_client, &bob, &join_info), JoinPartyCompletionResult::Succeeded);
    assert!(bob_events.contains(&ClientEvent::PartyJoined {
        local_user_id: bob.clone(),
        party_id: party_id.clone(),
    }));
    assert!(alice_events.contains(&ClientEvent::PartyMemberJoined {
        local_user_id: alice.clone(),
        party_id: party_id.clone(),
        member_id: bob.clone(),
    }));
    assert!(alice_client
        .parties
        .pending_invited_users(&alice, &party_id)
        .is_empty());

    let slot = ResultSlot::new();
    let slot_in_callback = slot.clone();
    assert!(alice_client
        .parties
        .kick_member(&alice, &party_id, &bob, move |_, _, _, result| {
            slot_in_callback.set(result)
        }));
    assert_eq!(slot.take(), Some(KickMemberCompletionResult::Succeeded));

    assert!(bob_events.contains(&ClientEvent::PartyMemberExited {
        local_user_id: bob.clone(),
        party_id: party_id.clone(),
        member_id: bob.clone(),
        reason: MemberExitedReason::Kicked,
    }));
    assert!(bob_events.contains(&ClientEvent::PartyExited {
        local_user_id: bob.clone(),
        party_id: party_id.clone(),
    }));
    assert!(bob_client.parties.joined_parties(&bob).is_empty());
    assert_eq!(alice_client.parties.party_member_count(&alice, &party_id), 1);
}

#[test]
fn test_reject_invitation() {
    let env = TestEnvironment::new();
    let (alice_client, alice_events) = env.client("alice", "Alice");
    let (bob_client, bob_events) = env.client("bob", "Bob");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let party_id = create_party(&alice_client, &alice, PartyConfiguration::default());

    alice_client.invites.send_invitation(
        &alice,
        &party_id,
        &bob,
        PartyData::new(),
        |_, _, _, _| {},
    );

    assert!(bob_client.invites.reject_invitation(&bob, &alice));
    assert!(bob_client.invites.pending_invites(&bob).is_empty());
    assert!(bob_events.contains(&ClientEvent::PartyInvitesChanged {
        local_user_id: bob.clone(),
    }));
    assert!(alice_events.contains(&ClientEvent::PartyInviteResponseReceived {
        local_user_id: alice.clone(),
        party_id: party_id.clone(),
        sender_id: bob.clone(),
        response: InvitationResponse::Rejected,
    }));
    // The rejection frees the invite slot again.
    assert!(alice_client
        .parties
        .pending_invited_users(&alice, &party_id)
        .is_empty());

    // Answering twice has nothing left to answer.
    assert!(!bob_client.invites.reject_invitation(&bob, &alice));
}

#[test]
fn test_only_the_leader_may_invite_by_default() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let (bob_client, _) = env.client("bob", "Bob");
    let (_carol_client, _) = env.client("carol", "Carol");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");
    let carol = UserId::from("carol");

    let party_id = create_party(&alice_client, &alice, auto_approve_config(0));
    join_via_presence(&bob_client, &bob, &alice);

    let accepted = bob_client.invites.send_invitation(
        &bob,
        &party_id,
        &carol,
        PartyData::new(),
        |_, _, _, _| panic!("rejected invitation must not fire its callback"),
    );
    assert!(!accepted);
}

#[test]
fn test_duplicate_invitation_is_rejected() {
    let env = TestEnvironment::new();
    let (alice_client, _) = env.client("alice", "Alice");
    let (_bob_client, _) = env.client("bob", "Bob");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let party_id = create_party(&alice_client, &alice, PartyConfiguration::default());

    assert!(alice_client.invites.send_invitation(
        &alice,
        &party_id,
        &bob,
        PartyData::new(),
        |_, _, _, _| {},
    ));
    let accepted = alice_client.invites.send_invitation(
        &alice,
        &party_id,
        &bob,
        PartyData::new(),
        |_, _, _, _| panic!("rejected invitation must not fire its callback"),
    );
    assert!(!accepted);
}

#[test]
fn test_request_invitation_reaches_the_advertiser() {
    let env = TestEnvironment::new();
    let (alice_client, alice_events) = env.client("alice", "Alice");
    let (bob_client, _) = env.client("bob", "Bob");
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let party_id = create_party(&alice_client, &alice, PartyConfiguration::default());

    let slot = ResultSlot::new();
    let slot_in_callback = slot.clone();
    assert!(bob_client.invites.request_invitation(
        &bob,
        &alice,
        &party_id,
        move |_, _, result| slot_in_callback.set(result),
    ));
    assert_eq!(
        slot.take(),
        Some(RequestPartyInvitationCompletionResult::Succeeded)
    );

    assert!(alice_events.contains(&ClientEvent::PartyInviteRequestReceived {
        local_user_id: alice.clone(),
        party_id: party_id.clone(),
        sender_id: bob.clone(),
        request_for_id: bob.clone(),
    }));
}
