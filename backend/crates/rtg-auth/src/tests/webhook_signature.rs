use crate::{AuthError, WebhookVerifier};

use proptest::prelude::*;

const SECRET: &str = "whsec_test_secret";
const BODY: &[u8] = br#"{"type":"payment_intent.succeeded","id":"evt_123"}"#;

#[test]
fn given_prefixed_signature_when_verified_then_ok() {
    let signature = WebhookVerifier::sign(BODY, SECRET);

    assert!(signature.starts_with("sha256="));
    assert!(WebhookVerifier::verify(BODY, &signature, SECRET).is_ok());
}

#[test]
fn given_bare_hex_signature_when_verified_then_ok() {
    let signature = WebhookVerifier::sign(BODY, SECRET);
    let bare = signature.trim_start_matches("sha256=");

    assert!(WebhookVerifier::verify(BODY, bare, SECRET).is_ok());
}

#[test]
fn given_altered_body_when_verified_then_invalid_signature() {
    let signature = WebhookVerifier::sign(BODY, SECRET);
    let altered = br#"{"type":"payment_intent.succeeded","id":"evt_124"}"#;

    let result = WebhookVerifier::verify(altered, &signature, SECRET);

    assert!(matches!(result, Err(AuthError::InvalidSignature { .. })));
}

#[test]
fn given_wrong_secret_when_verified_then_invalid_signature() {
    let signature = WebhookVerifier::sign(BODY, SECRET);

    let result = WebhookVerifier::verify(BODY, &signature, "another-secret");

    assert!(matches!(result, Err(AuthError::InvalidSignature { .. })));
}

#[test]
fn given_other_prefix_when_verified_then_invalid_signature() {
    let signature = WebhookVerifier::sign(BODY, SECRET).replace("sha256=", "sha1=");

    let result = WebhookVerifier::verify(BODY, &signature, SECRET);

    assert!(matches!(result, Err(AuthError::InvalidSignature { .. })));
}

#[test]
fn given_non_hex_or_short_digest_when_verified_then_invalid_signature() {
    assert!(WebhookVerifier::verify(BODY, "sha256=zz", SECRET).is_err());
    assert!(WebhookVerifier::verify(BODY, "sha256=abcd", SECRET).is_err());
    assert!(WebhookVerifier::verify(BODY, "", SECRET).is_err());
}

proptest! {
    #[test]
    fn signed_bodies_always_verify(
        body in proptest::collection::vec(any::<u8>(), 0..512),
        secret in "[a-zA-Z0-9_]{1,64}",
    ) {
        let signature = WebhookVerifier::sign(&body, &secret);
        prop_assert!(WebhookVerifier::verify(&body, &signature, &secret).is_ok());
    }

    #[test]
    fn flipping_any_body_byte_breaks_the_signature(
        body in proptest::collection::vec(any::<u8>(), 1..256),
        index in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let signature = WebhookVerifier::sign(&body, SECRET);
        let mut tampered = body.clone();
        let position = index.index(tampered.len());
        tampered[position] ^= flip;

        prop_assert!(WebhookVerifier::verify(&tampered, &signature, SECRET).is_err());
    }
}
