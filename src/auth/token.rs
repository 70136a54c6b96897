//! Access token issuance and verification.
//!
//! Tokens are JWTs carrying `{sub: user id, exp: unix time}`, signed with
//! a process-wide symmetric key loaded once at startup.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, VaultError};

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expiration (unix seconds).
    pub exp: i64,
}

/// Token signer: encoding side of the process-wide signing key.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    header: Header,
    ttl_minutes: i64,
}

impl TokenSigner {
    /// Create a signer from the configured secret and algorithm.
    pub fn new(secret: &str, algorithm: Algorithm, ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            header: Header::new(algorithm),
            ttl_minutes,
        }
    }

    /// Issue a signed access token for a user.
    ///
    /// The subject is always non-empty and the expiry lies in the future
    /// at issuance time.
    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        self.issue_with_ttl(user_id, self.ttl_minutes)
    }

    /// Issue a token with an explicit TTL in minutes.
    pub fn issue_with_ttl(&self, user_id: Uuid, ttl_minutes: i64) -> Result<String> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
        };

        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| VaultError::Auth(format!("failed to encode token: {e}")))
    }
}

/// Token verifier: decoding side of the process-wide signing key.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Create a verifier from the configured secret and algorithm.
    pub fn new(secret: &str, algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a token and return its claims.
    ///
    /// Fails if the signature does not verify or the expiry has passed.
    /// The subject still has to be resolved against the credential store
    /// by the caller.
    pub fn verify(&self, token: &str) -> Result<JwtClaims> {
        decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("token validation failed: {}", e);
                VaultError::Auth("invalid or expired token".to_string())
            })
    }
}
