//! Password-hash and token contracts. These run without any test
//! infrastructure — the primitives are pure functions over the key.

use std::time::Duration;

use ripple::app::auth::{hash_password, issue_token, verify_password, verify_token};

const KEY: [u8; 32] = *b"0123456789abcdef0123456789abcdef";
const OTHER_KEY: [u8; 32] = *b"fedcba9876543210fedcba9876543210";

const TTL: Duration = Duration::from_secs(60 * 60);

// ===========================================================================
// Password hashing
// ===========================================================================

#[test]
fn hash_then_verify_roundtrip() {
    let hash = hash_password("correct horse battery staple").unwrap();
    assert!(verify_password("correct horse battery staple", &hash).unwrap());
}

#[test]
fn verify_rejects_wrong_password() {
    let hash = hash_password("demo1234").unwrap();
    assert!(!verify_password("demo12345", &hash).unwrap());
    assert!(!verify_password("", &hash).unwrap());
}

#[test]
fn hashes_are_salted() {
    // Same input, fresh salt each call: the PHC strings must differ, and
    // each must still verify on its own.
    let first = hash_password("demo1234").unwrap();
    let second = hash_password("demo1234").unwrap();
    assert_ne!(first, second);
    assert!(verify_password("demo1234", &first).unwrap());
    assert!(verify_password("demo1234", &second).unwrap());
}

#[test]
fn verify_rejects_garbage_hash() {
    assert!(verify_password("demo1234", "not-a-phc-string").is_err());
}

// ===========================================================================
// Tokens
// ===========================================================================

#[test]
fn token_roundtrip_carries_claims() {
    let token = issue_token(&KEY, TTL, 42, "alice@example.com").unwrap();

    let claims = verify_token(&KEY, &token).unwrap().expect("token rejected");
    assert_eq!(claims.user_id, 42);
    assert_eq!(claims.email, "alice@example.com");
}

#[test]
fn tampered_token_is_rejected() {
    let token = issue_token(&KEY, TTL, 42, "alice@example.com").unwrap();

    // Flip one character anywhere in the token body.
    let mut tampered: Vec<char> = token.chars().collect();
    let idx = tampered.len() / 2;
    tampered[idx] = if tampered[idx] == 'A' { 'B' } else { 'A' };
    let tampered: String = tampered.into_iter().collect();

    assert!(verify_token(&KEY, &tampered).unwrap().is_none());
}

#[test]
fn truncated_token_is_rejected() {
    let token = issue_token(&KEY, TTL, 42, "alice@example.com").unwrap();
    let truncated = &token[..token.len() - 10];

    assert!(verify_token(&KEY, truncated).unwrap().is_none());
}

#[test]
fn wrong_key_is_rejected() {
    let token = issue_token(&KEY, TTL, 42, "alice@example.com").unwrap();

    assert!(verify_token(&OTHER_KEY, &token).unwrap().is_none());
}

#[test]
fn malformed_token_is_rejected() {
    assert!(verify_token(&KEY, "not-a-token").unwrap().is_none());
    assert!(verify_token(&KEY, "").unwrap().is_none());
}

#[test]
fn expired_token_is_rejected() {
    let token = issue_token(&KEY, Duration::from_secs(1), 42, "alice@example.com").unwrap();
    assert!(verify_token(&KEY, &token).unwrap().is_some());

    std::thread::sleep(Duration::from_secs(2));

    assert!(verify_token(&KEY, &token).unwrap().is_none());
}
