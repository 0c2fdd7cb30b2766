//! Signed session tokens for the web API.
//!
//! A [SessionToken] identifies the logged-in user. It is issued by the login endpoint, carried by
//! the client in the `X-SESSION-TOKEN` header and verified on every request. The token string is
//! `base64url(payload) "." base64url(hmac_sha256(payload, SECRET))`, so the server does not need
//! any session storage; the user's current role is re-read from the database on every request.

use base64::prelude::{Engine, BASE64_URL_SAFE_NO_PAD};
use ring::hmac;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub struct SessionToken {
    user_id: Uuid,
    issued_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize)]
struct TokenPayload {
    uid: Uuid,
    iat: i64,
}

impl SessionToken {
    /// Create a fresh token for the given user, issued now.
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            issued_at: chrono::Utc::now(),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Parse and verify a token string received from a client.
    ///
    /// Fails if the string is not of the expected shape, the signature does not match the
    /// application secret, or the token is older than `max_age`.
    pub fn from_string(
        data: &str,
        secret: &str,
        max_age: std::time::Duration,
    ) -> Result<Self, SessionError> {
        let (payload_part, signature_part) = data
            .split_once('.')
            .ok_or(SessionError::InvalidTokenFormat)?;
        let payload_bytes = BASE64_URL_SAFE_NO_PAD
            .decode(payload_part)
            .map_err(|_| SessionError::InvalidTokenFormat)?;
        let signature = BASE64_URL_SAFE_NO_PAD
            .decode(signature_part)
            .map_err(|_| SessionError::InvalidTokenFormat)?;

        let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
        hmac::verify(&key, &payload_bytes, &signature)
            .map_err(|_| SessionError::SignatureVerificationFailed)?;

        let payload: TokenPayload = serde_json::from_slice(&payload_bytes)
            .map_err(|_| SessionError::InvalidTokenFormat)?;
        let issued_at = chrono::DateTime::from_timestamp(payload.iat, 0)
            .ok_or(SessionError::InvalidTokenFormat)?;
        let age = chrono::Utc::now() - issued_at;
        if age > chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::MAX) {
            return Err(SessionError::ExpiredToken);
        }

        Ok(Self {
            user_id: payload.uid,
            issued_at,
        })
    }

    /// Serialize and sign the token for sending it to the client.
    pub fn as_string(&self, secret: &str) -> String {
        let payload = serde_json::to_vec(&TokenPayload {
            uid: self.user_id,
            iat: self.issued_at.timestamp(),
        })
        .expect("token payload serialization cannot fail");
        let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
        let signature = hmac::sign(&key, &payload);
        format!(
            "{}.{}",
            BASE64_URL_SAFE_NO_PAD.encode(&payload),
            BASE64_URL_SAFE_NO_PAD.encode(signature.as_ref())
        )
    }
}

#[derive(Debug)]
pub enum SessionError {
    InvalidTokenFormat,
    SignatureVerificationFailed,
    ExpiredToken,
}
