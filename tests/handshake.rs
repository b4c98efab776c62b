//! End-to-end handshake scenarios from the spec's testable-properties list.

use ecjpake::{EcJpakeError, Group, Session};
use rand::thread_rng;

fn run_rounds_1_and_2(alice: &mut Session, bob: &mut Session) {
    let mut rng = thread_rng();

    let alice_step1 = alice.step1_generate(&mut rng).unwrap();
    let bob_step1 = bob.step1_generate(&mut rng).unwrap();
    alice.step1_process(&bob_step1).unwrap();
    bob.step1_process(&alice_step1).unwrap();

    let alice_step2 = alice.step2_generate(&mut rng).unwrap();
    let bob_step2 = bob.step2_generate(&mut rng).unwrap();
    alice.step2_process(&bob_step2).unwrap();
    bob.step2_process(&alice_step2).unwrap();
}

#[test]
fn happy_path_matching_keys_and_confirmation() {
    let mut alice = Session::open(Group::P256, b"hunter2", b"alice", b"bob").unwrap();
    let mut bob = Session::open(Group::P256, b"hunter2", b"bob", b"alice").unwrap();

    run_rounds_1_and_2(&mut alice, &mut bob);

    let alice_key = *alice.key().unwrap();
    let bob_key = *bob.key().unwrap();
    assert_eq!(alice_key, bob_key);

    let alice_3a = alice.step3a_generate().unwrap();
    bob.step3a_process(&alice_3a).unwrap();

    let bob_3b = bob.step3b_generate().unwrap();
    alice.step3b_process(&bob_3b).unwrap();

    assert_eq!(
        hex::encode(alice_key),
        hex::encode(bob_key),
        "both parties should agree on the shared key's hex encoding"
    );
}

#[test]
fn wrong_password_is_undetected_until_confirmation() {
    let mut alice = Session::open(Group::Secp256k1, b"hunter2", b"alice", b"bob").unwrap();
    let mut bob = Session::open(Group::Secp256k1, b"hunter3", b"bob", b"alice").unwrap();

    run_rounds_1_and_2(&mut alice, &mut bob);

    // Steps 1 and 2 succeeded on both sides even with mismatched secrets —
    // the protocol cannot detect a password mismatch any earlier.
    assert!(alice.key().is_some());
    assert!(bob.key().is_some());
    assert_ne!(alice.key().unwrap(), bob.key().unwrap());

    let alice_3a = alice.step3a_generate().unwrap();
    let err = bob.step3a_process(&alice_3a).unwrap_err();
    assert_eq!(err, EcJpakeError::HashOfHashOfKeyMismatch);
}

#[test]
fn peer_identity_point_as_gx3_is_rejected() {
    let mut rng = thread_rng();
    let mut alice = Session::open(Group::P256, b"hunter2", b"alice", b"bob").unwrap();
    let mut bob = Session::open(Group::P256, b"hunter2", b"bob", b"alice").unwrap();

    let _ = alice.step1_generate(&mut rng).unwrap();
    let mut bob_step1 = bob.step1_generate(&mut rng).unwrap();

    // Replace Bob's g_x3 (p1.gx) with the identity point. His ZKP was
    // computed against the real point, so legality is checked first and
    // fails before the (now-mismatched) proof is even verified.
    let identity_group = Group::P256;
    let order_minus_one = identity_group.order() - num_bigint_dig::BigInt::from(1u8);
    let neg_one = identity_group.scalar_from_bigint_mod_q(&order_minus_one);
    let g = identity_group.generator();
    let identity = g.add(&g.mul(&neg_one).unwrap()).unwrap();
    bob_step1.p1.gx = identity;

    let err = alice.step1_process(&bob_step1).unwrap_err();
    assert_eq!(err, EcJpakeError::GToTheX3IsNotLegal);
}

#[test]
fn peer_payload_from_wrong_curve_is_rejected_not_panicked() {
    let mut rng = thread_rng();
    let mut alice = Session::open(Group::P256, b"hunter2", b"alice", b"bob").unwrap();
    let mut bob = Session::open(Group::Secp256k1, b"hunter2", b"bob", b"alice").unwrap();

    let _ = alice.step1_generate(&mut rng).unwrap();
    // Bob's session is pinned to a different curve. A caller that forwards
    // his (otherwise well-formed) Step1 to Alice without checking the curve
    // must get an `Err` back, not a process crash.
    let bob_step1 = bob.step1_generate(&mut rng).unwrap();

    let err = alice.step1_process(&bob_step1).unwrap_err();
    assert_eq!(err, EcJpakeError::VerifyX3Failed);
}

#[test]
fn zkp_reflection_attack_is_rejected() {
    let mut rng = thread_rng();
    let mut alice = Session::open(Group::P256, b"hunter2", b"alice", b"bob").unwrap();
    let mut bob = Session::open(Group::P256, b"hunter2", b"bob", b"alice").unwrap();

    let alice_step1 = alice.step1_generate(&mut rng).unwrap();
    let _ = bob.step1_generate(&mut rng).unwrap();

    // Bob resends Alice's own p1 (point + ZKP, both labeled "alice") back to
    // her as if it were his p1. The point matches nothing suspicious on its
    // own, but the ZKP's baked-in challenge used prover_id = "alice", while
    // Alice verifies peer payloads against peer_id = "bob" — a mismatch.
    let mut forged_step1 = bob.step1_generate(&mut rng).unwrap();
    forged_step1.p1 = alice_step1.p1.clone();

    let err = alice.step1_process(&forged_step1).unwrap_err();
    assert_eq!(err, EcJpakeError::VerifyX3Failed);
}

#[test]
fn bit_flip_in_step1_is_rejected() {
    let mut rng = thread_rng();
    let mut alice = Session::open(Group::P256, b"hunter2", b"alice", b"bob").unwrap();
    let mut bob = Session::open(Group::P256, b"hunter2", b"bob", b"alice").unwrap();

    let _ = alice.step1_generate(&mut rng).unwrap();
    let mut bob_step1 = bob.step1_generate(&mut rng).unwrap();

    let mut tampered = bob_step1.p1.zkp.b.to_bytes();
    tampered[31] ^= 0x01;
    bob_step1.p1.zkp.b = Group::P256.scalar_from_bigint_mod_q(&num_bigint_dig::BigInt::from_bytes_be(
        num_bigint_dig::Sign::Plus,
        &tampered,
    ));

    assert!(alice.step1_process(&bob_step1).is_err());
}

#[test]
fn bit_flip_in_step2_is_rejected() {
    let mut rng = thread_rng();
    let mut alice = Session::open(Group::P256, b"hunter2", b"alice", b"bob").unwrap();
    let mut bob = Session::open(Group::P256, b"hunter2", b"bob", b"alice").unwrap();

    let alice_step1 = alice.step1_generate(&mut rng).unwrap();
    let bob_step1 = bob.step1_generate(&mut rng).unwrap();
    alice.step1_process(&bob_step1).unwrap();
    bob.step1_process(&alice_step1).unwrap();

    let _ = alice.step2_generate(&mut rng).unwrap();
    let mut bob_step2 = bob.step2_generate(&mut rng).unwrap();

    let mut tampered = bob_step2.zkp.b.to_bytes();
    tampered[0] ^= 0x80;
    bob_step2.zkp.b = Group::P256.scalar_from_bigint_mod_q(&num_bigint_dig::BigInt::from_bytes_be(
        num_bigint_dig::Sign::Plus,
        &tampered,
    ));

    assert!(alice.step2_process(&bob_step2).is_err());
}

#[test]
fn tampering_with_local_id_breaks_verification() {
    let mut rng = thread_rng();
    // Alice opens believing her own id is "mallory" instead of "alice" —
    // her ZKPs get labeled with the wrong identity.
    let mut alice = Session::open(Group::P256, b"hunter2", b"mallory", b"bob").unwrap();
    let mut bob = Session::open(Group::P256, b"hunter2", b"bob", b"alice").unwrap();

    let alice_step1 = alice.step1_generate(&mut rng).unwrap();
    let _ = bob.step1_generate(&mut rng).unwrap();

    // Bob still expects peer_id == "alice", so Alice's ZKPs (labeled
    // "mallory") fail to verify.
    let err = bob.step1_process(&alice_step1).unwrap_err();
    assert_eq!(err, EcJpakeError::VerifyX3Failed);
}

#[test]
fn repeated_step1_generate_yields_fresh_randomness_and_a_different_key() {
    let mut rng = thread_rng();
    let mut alice = Session::open(Group::P256, b"hunter2", b"alice", b"bob").unwrap();
    let mut bob = Session::open(Group::P256, b"hunter2", b"bob", b"alice").unwrap();

    run_rounds_1_and_2(&mut alice, &mut bob);
    let first_key = *alice.key().unwrap();
    assert_eq!(alice.key(), bob.key());

    // Renegotiate on the very same `alice`/`bob` instances: a second
    // `step1_generate` restarts the handshake on each, and driving it all
    // the way through `step2_process` again must land on a new key both
    // sides still agree on.
    run_rounds_1_and_2(&mut alice, &mut bob);
    let second_key = *alice.key().unwrap();

    assert_ne!(first_key, second_key);
    assert_eq!(alice.key(), bob.key());

    // Two independent fresh session pairs naturally land on their own key.
    let mut alice2 = Session::open(Group::P256, b"hunter2", b"alice", b"bob").unwrap();
    let mut bob2 = Session::open(Group::P256, b"hunter2", b"bob", b"alice").unwrap();
    run_rounds_1_and_2(&mut alice2, &mut bob2);
    assert_ne!(second_key, *alice2.key().unwrap());

    // Two successive step1_generate calls on the same session also differ.
    let step1_a = alice.step1_generate(&mut rng).unwrap();
    let step1_b = alice.step1_generate(&mut rng).unwrap();
    assert_ne!(step1_a.p1.gx, step1_b.p1.gx);
    assert_ne!(step1_a.p2.gx, step1_b.p2.gx);
}

#[test]
fn opening_with_equal_identities_fails() {
    let err = Session::open(Group::P256, b"hunter2", b"same", b"same").unwrap_err();
    assert_eq!(err, EcJpakeError::CtxNew("local_id must differ from peer_id"));
}

#[test]
fn secp256k1_and_p256_both_complete_a_handshake() {
    for group in [Group::P256, Group::Secp256k1] {
        let mut alice = Session::open(group, b"hunter2", b"alice", b"bob").unwrap();
        let mut bob = Session::open(group, b"hunter2", b"bob", b"alice").unwrap();
        run_rounds_1_and_2(&mut alice, &mut bob);
        assert_eq!(alice.key(), bob.key());
    }
}
