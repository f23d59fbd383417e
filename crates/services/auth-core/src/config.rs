//! Auth core configuration.

use std::str::FromStr;

use chrono::Duration;
use jsonwebtoken::Algorithm;

use common::{ConfigError, JwtConfig};
use domain::{
    DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES, MAX_ACCESS_TOKEN_EXPIRE_MINUTES, MIN_JWT_SECRET_LENGTH,
};

/// Validated token configuration, fixed for the lifetime of the process.
#[derive(Clone)]
pub struct AuthConfig {
    secret: String,
    /// HMAC algorithm used to sign and verify tokens
    pub algorithm: Algorithm,
    /// Lifetime of tokens issued at login
    pub access_token_ttl: Duration,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("access_token_ttl", &self.access_token_ttl)
            .finish()
    }
}

impl AuthConfig {
    /// Build a configuration, rejecting weak secrets, non-HMAC algorithms and
    /// lifetimes outside `(0, MAX_ACCESS_TOKEN_EXPIRE_MINUTES]`.
    pub fn new(
        secret: impl Into<String>,
        algorithm: Algorithm,
        access_token_ttl: Duration,
    ) -> Result<Self, ConfigError> {
        let secret = secret.into();

        if secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::invalid(
                "JWT_SECRET",
                format!("must be at least {} characters long", MIN_JWT_SECRET_LENGTH),
            ));
        }

        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(ConfigError::invalid(
                "JWT_ALGORITHM",
                format!("{:?} is not a symmetric algorithm", algorithm),
            ));
        }

        if access_token_ttl <= Duration::zero() {
            return Err(ConfigError::invalid(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                "must be greater than zero",
            ));
        }

        if access_token_ttl > Duration::minutes(MAX_ACCESS_TOKEN_EXPIRE_MINUTES) {
            return Err(ConfigError::invalid(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                format!("must be at most {}", MAX_ACCESS_TOKEN_EXPIRE_MINUTES),
            ));
        }

        Ok(Self {
            secret,
            algorithm,
            access_token_ttl,
        })
    }

    /// HS256 with the default 30 minute lifetime.
    pub fn with_secret(secret: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(
            secret,
            Algorithm::HS256,
            Duration::minutes(DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES),
        )
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::try_from(JwtConfig::from_env()?)
    }

    /// Get the signing secret as bytes.
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

impl TryFrom<JwtConfig> for AuthConfig {
    type Error = ConfigError;

    fn try_from(raw: JwtConfig) -> Result<Self, Self::Error> {
        let algorithm = Algorithm::from_str(raw.algorithm.trim())
            .map_err(|_| ConfigError::invalid("JWT_ALGORITHM", raw.algorithm.clone()))?;

        let ttl = Duration::try_minutes(raw.expire_minutes).ok_or_else(|| {
            ConfigError::invalid(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                format!("{} is out of range", raw.expire_minutes),
            )
        })?;

        Self::new(raw.secret, algorithm, ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-testing-only-32chars";

    fn raw(algorithm: &str, expire_minutes: i64) -> JwtConfig {
        JwtConfig {
            secret: SECRET.to_string(),
            algorithm: algorithm.to_string(),
            expire_minutes,
        }
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::with_secret(SECRET).unwrap();
        assert_eq!(config.algorithm, Algorithm::HS256);
        assert_eq!(config.access_token_ttl, Duration::minutes(30));
    }

    #[test]
    fn test_short_secret_rejected() {
        let err = AuthConfig::with_secret("too-short").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "JWT_SECRET", .. }));
    }

    #[test]
    fn test_asymmetric_algorithm_rejected() {
        let err = AuthConfig::try_from(raw("RS256", 30)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "JWT_ALGORITHM", .. }));
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let err = AuthConfig::try_from(raw("HS999", 30)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "JWT_ALGORITHM", .. }));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let err = AuthConfig::try_from(raw("HS256", 0)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                ..
            }
        ));
    }

    #[test]
    fn test_unrepresentable_ttl_rejected() {
        let err = AuthConfig::try_from(raw("HS256", i64::MAX)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                ..
            }
        ));
    }

    #[test]
    fn test_ttl_above_maximum_rejected() {
        let err = AuthConfig::new(
            SECRET,
            Algorithm::HS256,
            Duration::minutes(1_000_000_000_000),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                ..
            }
        ));

        let config = AuthConfig::try_from(raw("HS256", MAX_ACCESS_TOKEN_EXPIRE_MINUTES)).unwrap();
        assert_eq!(
            config.access_token_ttl,
            Duration::minutes(MAX_ACCESS_TOKEN_EXPIRE_MINUTES)
        );
    }

    #[test]
    fn test_from_raw_config() {
        let config = AuthConfig::try_from(raw("HS512", 5)).unwrap();
        assert_eq!(config.algorithm, Algorithm::HS512);
        assert_eq!(config.access_token_ttl, Duration::minutes(5));
        assert_eq!(config.secret_bytes(), SECRET.as_bytes());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AuthConfig::with_secret(SECRET).unwrap();
        assert!(!format!("{:?}", config).contains(SECRET));
    }
}
