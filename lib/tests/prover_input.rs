use groupsig_lib::anonymity::merkle::{verify_proof, LimbHasher};
use groupsig_lib::anonymity::roster::Roster;
use groupsig_lib::create_input::{create_prover_input, create_verifier_input, PreparedInput};
use groupsig_lib::{CircuitParams, InputError};

const ALICE_PUB: &str = include_str!("data/alice.pub");
const CAROL_PUB: &str = include_str!("data/carol.pub");
const BOB_PUB: &str = include_str!("data/bob_ed25519.pub");
const DAVE_PUB: &str = include_str!("data/parc4096.pub");
const HELLO_SIG: &str = include_str!("data/hello.sig");
const PARC_SIG: &str = include_str!("data/parc4096.sig");

/// 2048-bit circuit whose fixed string is what `hello.sig` signs
fn params_2048() -> CircuitParams {
    CircuitParams {
        modulus_bits: 2048,
        double_blind_message: "hello".to_string(),
        ..CircuitParams::default()
    }
}

fn roster_json() -> String {
    serde_json::json!({
        "group_members": {
            "carol": { "publicKeys": [
                { "id": 7, "key": CAROL_PUB.trim(), "title": "laptop", "type": "RSA" }
            ] },
            "bob": { "publicKeys": [
                { "id": 5, "key": BOB_PUB.trim(), "title": "yubikey", "type": "ED25519" }
            ] },
            "alice": { "publicKeys": [
                { "id": 1, "key": ALICE_PUB.trim(), "title": "desktop", "type": "RSA" },
                { "id": 2, "key": "ssh-rsa AAAAB3NzaC1yc2E=", "title": "broken", "type": "RSA" }
            ] }
        }
    })
    .to_string()
}

fn assert_merkle_proof(prepared: &PreparedInput) {
    let hasher = LimbHasher::new();
    let leaf = hasher.hash_limbs(&prepared.inputs.correct_key).unwrap();
    assert!(verify_proof(&hasher, &prepared.merkle_root, &leaf, &prepared.merkle_proof));
    assert_eq!(prepared.merkle_proof.leaf_index, prepared.signer_index);
}

#[test]
fn builds_padded_bundle_for_a_group_member() {
    let params = params_2048();
    let roster = Roster::from_json(&roster_json()).unwrap();
    let prepared = create_prover_input("Hi from the group", HELLO_SIG, &roster, &params).unwrap();

    assert!(prepared.signature_matches());
    // alice sorts first; bob's ed25519 key is filtered; alice's second key is broken
    assert_eq!(prepared.signer_index, 0);
    assert_eq!(prepared.real_members, 2);
    assert_eq!(prepared.skipped.len(), 1);
    assert_eq!(prepared.skipped[0].member, "alice");
    assert_eq!(prepared.skipped[0].key_index, 1);

    let inputs = &prepared.inputs;
    assert_eq!(inputs.message.len(), 5);
    assert_eq!(inputs.double_blind_message.len(), 18);
    assert_eq!(inputs.signature.len(), 18);
    assert_eq!(inputs.public_keys.len(), 300);
    assert!(inputs.public_keys[2..].iter().all(|k| *k == inputs.public_keys[0]));
    assert_eq!(inputs.public_keys[0], inputs.correct_key);
    assert_ne!(inputs.public_keys[1], inputs.correct_key);

    assert_merkle_proof(&prepared);
}

#[test]
fn bundle_serializes_with_circuit_names() {
    let roster = Roster::from_json(&roster_json()).unwrap();
    let prepared = create_prover_input("x", HELLO_SIG, &roster, &params_2048()).unwrap();
    let json: serde_json::Value = serde_json::to_value(&prepared.inputs).unwrap();
    for name in ["message", "doubleBlindMessage", "publicKeys", "signature", "correctKey"] {
        assert!(json.get(name).is_some(), "missing {}", name);
    }
    assert_eq!(json["publicKeys"].as_array().unwrap().len(), 300);
    assert!(json["signature"][0].is_string());
}

#[test]
fn verifier_recomputes_the_same_public_signals() {
    let params = params_2048();
    let roster = Roster::from_json(&roster_json()).unwrap();
    let prepared = create_prover_input("agreed text", HELLO_SIG, &roster, &params).unwrap();
    let signals = create_verifier_input("agreed text", &roster, &params).unwrap();
    assert_eq!(signals, prepared.inputs.public_signals());
    assert_eq!(signals.len(), 5 + 18 + 300 * 18);
    assert_ne!(create_verifier_input("other text", &roster, &params).unwrap(), signals);
}

#[test]
fn signer_outside_the_group_is_rejected() {
    let mut roster = Roster::default();
    roster.push_key("carol", CAROL_PUB.trim());
    let err = create_prover_input("hi", HELLO_SIG, &roster, &params_2048()).err().unwrap();
    assert!(matches!(err, InputError::SignerNotInGroup));
}

#[test]
fn group_larger_than_capacity_is_rejected() {
    let params = CircuitParams {
        max_keys: 1,
        ..params_2048()
    };
    let roster = Roster::from_json(&roster_json()).unwrap();
    let err = create_prover_input("hi", HELLO_SIG, &roster, &params).err().unwrap();
    assert!(matches!(err, InputError::TooManyKeys { max: 1, actual: 2 }));
}

#[test]
fn signature_over_another_string_fails_preflight_only() {
    let params = CircuitParams {
        double_blind_message: "0xPARC".to_string(),
        ..params_2048()
    };
    let roster = Roster::from_json(&roster_json()).unwrap();
    let prepared = create_prover_input("hi", HELLO_SIG, &roster, &params).unwrap();
    assert!(!prepared.signature_matches());
}

#[test]
fn four_kilobit_circuit_skips_smaller_keys() {
    let params = CircuitParams::default();
    let mut roster = Roster::default();
    roster.push_key("alice", ALICE_PUB.trim());
    roster.push_key("bob", BOB_PUB.trim());
    roster.push_key("dave", DAVE_PUB.trim());

    let prepared = create_prover_input("hello", PARC_SIG, &roster, &params).unwrap();
    assert!(prepared.signature_matches());
    assert_eq!(prepared.real_members, 1);
    assert_eq!(prepared.signer_index, 0);
    assert_eq!(prepared.skipped.len(), 1);
    assert!(prepared.skipped[0].reason.contains("2048"));
    assert_eq!(prepared.inputs.double_blind_message.len(), 35);
    assert_merkle_proof(&prepared);
}

#[test]
fn signer_key_of_the_wrong_size_is_fatal() {
    let mut roster = Roster::default();
    roster.push_key("alice", ALICE_PUB.trim());
    let err = create_prover_input("hi", HELLO_SIG, &roster, &CircuitParams::default())
        .err()
        .unwrap();
    assert!(matches!(
        err,
        InputError::KeySizeMismatch { expected: 4096, actual: 2048 }
    ));
}

#[test]
fn malformed_roster_entry_is_skipped_not_fatal() {
    let json = serde_json::json!({
        "group_members": {
            "alice": { "publicKeys": [
                { "id": 1, "key": ALICE_PUB.trim(), "type": "RSA" }
            ] },
            "carol": { "publicKeys": [
                { "id": "7", "key": CAROL_PUB.trim(), "type": "RSA" }
            ] },
            "erin": { "publicKeys": [
                { "id": 9, "key": 42, "type": "RSA" },
                { "id": 10, "key": BOB_PUB.trim(), "type": "ED25519_SK" }
            ] }
        }
    })
    .to_string();
    let roster = Roster::from_json(&json).unwrap();
    let prepared = create_prover_input("hi", HELLO_SIG, &roster, &params_2048()).unwrap();

    assert_eq!(prepared.real_members, 2);
    assert_eq!(prepared.signer_index, 0);
    assert_eq!(prepared.skipped.len(), 1);
    assert_eq!(prepared.skipped[0].member, "erin");
    assert_eq!(prepared.skipped[0].key_index, 0);
    assert_merkle_proof(&prepared);
}
