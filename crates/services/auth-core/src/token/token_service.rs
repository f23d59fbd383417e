//! Token service - issues and validates signed, time-bound access tokens.
//!
//! Tokens are HMAC-signed JWTs carrying only the username, the issue time and
//! the expiry. Nothing is stored server side: a token is valid exactly when its
//! signature verifies and its expiry has not passed.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use common::{AppError, AppResult};

use super::clock::{Clock, SystemClock};
use crate::config::AuthConfig;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued to
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Reasons a presented token is rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

/// Issues and validates access tokens with a process-wide key.
pub struct TokenService {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Create a token service reading the wall clock.
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a token service with an explicit time source.
    pub fn with_clock(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        // Expiry is checked against `clock` below, without leeway
        let mut validation = Validation::new(config.algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            header: Header::new(config.algorithm),
            encoding_key: EncodingKey::from_secret(config.secret_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_bytes()),
            validation,
            default_ttl: config.access_token_ttl,
            clock,
        }
    }

    /// Lifetime applied to tokens issued at login.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for `subject` that expires `ttl` from now.
    pub fn issue(&self, subject: &str, ttl: Duration) -> AppResult<String> {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::internal(format!("Token lifetime {} out of range", ttl)))?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))
    }

    /// Validate a token and return its subject.
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        if self.clock.now().timestamp() > claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use jsonwebtoken::Algorithm;
    use std::sync::Mutex;

    const SECRET: &str = "test-secret-key-for-testing-only-32chars";

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Utc::now())))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn config() -> AuthConfig {
        AuthConfig::with_secret(SECRET).unwrap()
    }

    fn service_with(clock: Arc<ManualClock>) -> TokenService {
        TokenService::with_clock(&config(), clock)
    }

    /// Replace one character in the middle of the signature segment.
    fn corrupt_signature(token: &str) -> String {
        let (head, signature) = token.rsplit_once('.').unwrap();
        let mut chars: Vec<char> = signature.chars().collect();
        let middle = chars.len() / 2;
        chars[middle] = if chars[middle] == 'A' { 'B' } else { 'A' };
        format!("{}.{}", head, chars.into_iter().collect::<String>())
    }

    #[test]
    fn test_issue_and_validate() {
        let tokens = TokenService::new(&config());

        let token = tokens.issue("alice", tokens.default_ttl()).unwrap();

        assert_eq!(tokens.validate(&token).unwrap(), "alice");
    }

    #[test]
    fn test_claims_carry_expiry() {
        let clock = ManualClock::new();
        let tokens = service_with(clock.clone());

        let token = tokens.issue("alice", Duration::minutes(30)).unwrap();
        let claims = decode::<Claims>(&token, &tokens.decoding_key, &tokens.validation)
            .unwrap()
            .claims;

        assert_eq!(claims.exp - claims.iat, 30 * 60);
        assert_eq!(claims.iat, clock.now().timestamp());
    }

    #[test]
    fn test_issue_rejects_unrepresentable_expiry() {
        let tokens = TokenService::new(&config());

        let result = tokens.issue("alice", Duration::MAX);

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_header_names_configured_algorithm() {
        let tokens = TokenService::new(&config());
        let token = tokens.issue("alice", Duration::minutes(1)).unwrap();

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
    }

    #[test]
    fn test_token_never_contains_secret() {
        let tokens = TokenService::new(&config());
        let token = tokens.issue("alice", Duration::minutes(1)).unwrap();

        assert!(!token.contains(SECRET));
    }

    #[test]
    fn test_expired_after_ttl() {
        let clock = ManualClock::new();
        let tokens = service_with(clock.clone());
        let token = tokens.issue("alice", Duration::minutes(30)).unwrap();

        clock.advance(Duration::minutes(30));
        assert_eq!(tokens.validate(&token).unwrap(), "alice");

        clock.advance(Duration::seconds(1));
        assert_eq!(tokens.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_corrupted_signature() {
        let tokens = TokenService::new(&config());
        let token = tokens.issue("alice", Duration::minutes(30)).unwrap();

        let result = tokens.validate(&corrupt_signature(&token));

        assert_eq!(result, Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_forged_subject() {
        let tokens = TokenService::new(&config());
        let alice = tokens.issue("alice", Duration::minutes(30)).unwrap();
        let mallory = tokens.issue("mallory", Duration::minutes(30)).unwrap();

        // Mallory's claims with alice's signature
        let alice_signature = alice.rsplit_once('.').unwrap().1;
        let mallory_head = mallory.rsplit_once('.').unwrap().0;
        let forged = format!("{}.{}", mallory_head, alice_signature);

        assert_eq!(tokens.validate(&forged), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_other_secret_rejected() {
        let tokens = TokenService::new(&config());
        let other = TokenService::new(
            &AuthConfig::with_secret("another-secret-key-also-32-chars-long!!").unwrap(),
        );

        let token = other.issue("alice", Duration::minutes(30)).unwrap();

        assert_eq!(tokens.validate(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let tokens = TokenService::new(&config());
        let hs512 = TokenService::new(
            &AuthConfig::new(SECRET, Algorithm::HS512, Duration::minutes(30)).unwrap(),
        );

        let token = hs512.issue("alice", Duration::minutes(30)).unwrap();

        assert_eq!(tokens.validate(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_malformed_tokens() {
        let tokens = TokenService::new(&config());

        for garbage in ["", "not-a-token", "a.b", "a.b.c", "a.b.c.d"] {
            assert_eq!(
                tokens.validate(garbage),
                Err(TokenError::Malformed),
                "input: {:?}",
                garbage
            );
        }
    }

    #[test]
    fn test_missing_subject_is_malformed() {
        let tokens = TokenService::new(&config());
        let exp = Utc::now().timestamp() + 600;
        let token = encode(
            &Header::default(),
            &serde_json::json!({ "exp": exp }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(tokens.validate(&token), Err(TokenError::Malformed));
    }
}
