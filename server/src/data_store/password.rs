//! Password hashing for user accounts, using PBKDF2-HMAC-SHA256.
//!
//! The stored format is `pbkdf2-sha256$<iterations>$<salt base64>$<hash base64>`, so the iteration
//! count can be raised later without invalidating existing hashes.

use base64::prelude::{Engine, BASE64_STANDARD_NO_PAD};
use ring::rand::SecureRandom;
use ring::{pbkdf2, rand};
use std::num::NonZeroU32;

const ALGORITHM_TAG: &str = "pbkdf2-sha256";
const ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

#[derive(Debug)]
pub struct PasswordHashingError;

impl std::fmt::Display for PasswordHashingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Could not generate random salt for password hashing")
    }
}

impl std::error::Error for PasswordHashingError {}

/// Hash a cleartext password with a fresh random salt for storing it in the user table.
pub fn hash_password(password: &str) -> Result<String, PasswordHashingError> {
    let mut salt = [0u8; SALT_LEN];
    rand::SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| PasswordHashingError)?;

    let mut hash = [0u8; HASH_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        NonZeroU32::new(ITERATIONS).expect("iteration count is non-zero"),
        &salt,
        password.as_bytes(),
        &mut hash,
    );

    Ok(format!(
        "{}${}${}${}",
        ALGORITHM_TAG,
        ITERATIONS,
        BASE64_STANDARD_NO_PAD.encode(salt),
        BASE64_STANDARD_NO_PAD.encode(hash)
    ))
}

/// Check a cleartext password against a stored hash string.
///
/// Returns false for a malformed stored hash; such values cannot be produced by [hash_password],
/// so this only hides corrupt database contents behind a failed login.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(tag), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    if tag != ALGORITHM_TAG {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let Some(iterations) = NonZeroU32::new(iterations) else {
        return false;
    };
    let (Ok(salt), Ok(hash)) = (
        BASE64_STANDARD_NO_PAD.decode(salt),
        BASE64_STANDARD_NO_PAD.decode(hash),
    ) else {
        return false;
    };

    pbkdf2::verify(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        &salt,
        password.as_bytes(),
        &hash,
    )
    .is_ok()
}
