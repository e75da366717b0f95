//! Bearer token verification.
//!
//! Tokens are HMAC-signed JWTs. The signing key is the base64 encoding of
//! the configured cluster key, used as raw key bytes.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix required on the `Authorization` header value.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Errors from token verification.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("authorization header is not a bearer token")]
    MalformedHeader,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Claims read from (and written to) user tokens.
#[derive(Debug, Serialize, Deserialize)]
struct UserClaims {
    sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iat: Option<u64>,
}

/// Verifies bearer tokens against a shared cluster key.
pub struct TokenVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Build a verifier for `cluster_key`. An empty key is accepted.
    pub fn new(cluster_key: &str) -> Self {
        let key = BASE64_STANDARD.encode(cluster_key.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // exp is checked only when present
        validation.required_spec_claims.clear();
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(key.as_bytes()),
            decoding: DecodingKey::from_secret(key.as_bytes()),
            validation,
        }
    }

    /// Verify a raw `Authorization` header value and return the subject.
    pub fn verify(&self, authorization: &str) -> Result<String, TokenError> {
        let token = authorization
            .strip_prefix(BEARER_PREFIX)
            .ok_or(TokenError::MalformedHeader)?;

        let data = decode::<UserClaims>(token.trim(), &self.decoding, &self.validation)?;
        Ok(data.claims.sub)
    }

    /// Sign an HS256 token for `subject`, optionally expiring after `ttl`.
    pub fn issue(&self, subject: &str, ttl: Option<Duration>) -> Result<String, TokenError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let claims = UserClaims {
            sub: subject.to_string(),
            exp: ttl.map(|ttl| now + ttl.as_secs()),
            iat: Some(now),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bearer(token: &str) -> String {
        format!("{BEARER_PREFIX}{token}")
    }

    #[test]
    fn test_verify_issued_token() {
        let verifier = TokenVerifier::new("cluster-secret");
        let token = verifier.issue("u1", None).unwrap();

        assert_eq!(verifier.verify(&bearer(&token)).unwrap(), "u1");
    }

    #[test]
    fn test_token_with_future_expiry() {
        let verifier = TokenVerifier::new("cluster-secret");
        let token = verifier.issue("u2", Some(Duration::from_secs(3600))).unwrap();

        assert_eq!(verifier.verify(&bearer(&token)).unwrap(), "u2");
    }

    #[test]
    fn test_expired_token_rejected() {
        let verifier = TokenVerifier::new("cluster-secret");
        let claims = UserClaims {
            sub: "u1".into(),
            exp: Some(1_000),
            iat: None,
        };
        let token = encode(&Header::default(), &claims, &verifier.encoding).unwrap();

        assert!(matches!(
            verifier.verify(&bearer(&token)),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_missing_prefix() {
        let verifier = TokenVerifier::new("cluster-secret");
        let token = verifier.issue("u1", None).unwrap();

        assert!(matches!(verifier.verify(&token), Err(TokenError::MalformedHeader)));
        assert!(matches!(
            verifier.verify(&format!("Basic {token}")),
            Err(TokenError::MalformedHeader)
        ));
    }

    #[test]
    fn test_garbage_token() {
        let verifier = TokenVerifier::new("cluster-secret");
        assert!(matches!(
            verifier.verify("Bearer not-a-jwt"),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let issuer = TokenVerifier::new("one-key");
        let verifier = TokenVerifier::new("another-key");
        let token = issuer.issue("u1", None).unwrap();

        assert!(matches!(
            verifier.verify(&bearer(&token)),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_key_is_base64_of_cluster_key() {
        let verifier = TokenVerifier::new("abc");
        let key = EncodingKey::from_secret(b"YWJj");
        let token = encode(
            &Header::default(),
            &UserClaims { sub: "u9".into(), exp: None, iat: None },
            &key,
        )
        .unwrap();

        assert_eq!(verifier.verify(&bearer(&token)).unwrap(), "u9");
    }

    #[test]
    fn test_hs512_accepted() {
        let verifier = TokenVerifier::new("k");
        let token = encode(
            &Header::new(Algorithm::HS512),
            &UserClaims { sub: "u5".into(), exp: None, iat: None },
            &verifier.encoding,
        )
        .unwrap();

        assert_eq!(verifier.verify(&bearer(&token)).unwrap(), "u5");
    }

    #[test]
    fn test_empty_cluster_key() {
        let verifier = TokenVerifier::new("");
        let token = verifier.issue("anon", None).unwrap();
        assert_eq!(verifier.verify(&bearer(&token)).unwrap(), "anon");
    }
}
