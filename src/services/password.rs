use hex::encode as hex_encode;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

use crate::config::DEFAULT_PBKDF2_ITERATIONS;

/// Hash a plaintext password with a fresh random salt.
///
/// Digest format: `pbkdf2:sha256:<iterations>$<salt>$<hex>`. The salt is
/// random per call, so hashing the same plaintext twice yields different
/// digests that both verify.
pub fn generate_password_hash(password: &str) -> String {
    let mut salt_bytes = [0u8; 12];
    rand::rngs::OsRng.fill_bytes(&mut salt_bytes);
    let salt = hex_encode(salt_bytes);
    let mut dk = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), DEFAULT_PBKDF2_ITERATIONS, &mut dk);
    let hash_hex = hex_encode(dk);
    format!("pbkdf2:sha256:{}${}${}", DEFAULT_PBKDF2_ITERATIONS, salt, hash_hex)
}

/// Verify a candidate password against a stored digest. A malformed
/// digest (truncated, wrong tag, bad iteration count) verifies false;
/// this function never panics on stored data.
pub fn verify_password(stored: &str, candidate: &str) -> bool {
    if let Some(rest) = stored.strip_prefix("pbkdf2:sha256:") {
        if let Some((iter_s, salt_hash)) = rest.split_once('$') {
            if let Some((salt, expected_hash)) = salt_hash.split_once('$') {
                if let Ok(iter) = iter_s.parse::<u32>() {
                    let mut dk = [0u8; 32];
                    pbkdf2_hmac::<Sha256>(candidate.as_bytes(), salt.as_bytes(), iter, &mut dk);
                    let computed = hex_encode(dk);
                    return computed == expected_hash;
                }
            }
        }
    }
    false
}

/// Opaque session token: 16 random bytes, hex-encoded.
pub fn random_session_id() -> String {
    let mut b = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut b);
    hex_encode(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_password_hashes_to_different_digests() {
        let a = generate_password_hash("pw12345");
        let b = generate_password_hash("pw12345");
        assert_ne!(a, b, "salt must be random per call");
        assert!(verify_password(&a, "pw12345"));
        assert!(verify_password(&b, "pw12345"));
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let digest = generate_password_hash("pw12345");
        assert!(!verify_password(&digest, "pw12346"));
        assert!(!verify_password(&digest, ""));
        assert!(!verify_password(&digest, "PW12345"));
    }

    #[test]
    fn digest_is_tagged_and_never_plaintext() {
        let digest = generate_password_hash("hunter22");
        assert!(digest.starts_with("pbkdf2:sha256:"));
        assert!(!digest.contains("hunter22"));
    }

    #[test]
    fn malformed_digests_verify_false() {
        for stored in [
            "",
            "plaintext",
            "pbkdf2:sha256:",
            "pbkdf2:sha256:100000$saltonly",
            "pbkdf2:sha256:notanumber$salt$hash",
            "pbkdf2:md5:100000$salt$hash",
        ] {
            assert!(!verify_password(stored, "pw12345"), "{stored:?} should not verify");
        }
    }

    #[test]
    fn session_ids_are_unique_and_opaque() {
        let a = random_session_id();
        let b = random_session_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }
}
