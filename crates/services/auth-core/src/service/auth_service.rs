//! Authentication service - signup, login and current-user resolution.
//!
//! Composes the user directory, the password value object and the token
//! service. Argon2 work runs on the blocking thread pool so slow hashing never
//! stalls other requests on the async executor.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use common::{AppError, AppResult};
use domain::{NewUser, Password, UserProfile, SIGNUP_SUCCESS_MESSAGE, TOKEN_TYPE_BEARER};
use user_directory::UserDirectory;

use crate::token::TokenService;

/// Response returned after a successful signup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SignupResponse {
    #[cfg_attr(feature = "openapi", schema(example = "User created successfully"))]
    pub message: String,
    /// Identifier assigned to the new user
    #[cfg_attr(feature = "openapi", schema(example = 1))]
    pub user_id: i32,
}

/// Token response returned after successful authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TokenResponse {
    /// Signed access token
    #[cfg_attr(
        feature = "openapi",
        schema(example = "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9...")
    )]
    pub access_token: String,
    /// Token type (always "bearer")
    #[cfg_attr(feature = "openapi", schema(example = "bearer"))]
    pub token_type: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn signup(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> AppResult<SignupResponse>;

    /// Check credentials and issue an access token
    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse>;

    /// Recover the user a presented access token was issued to
    async fn resolve_current_user(&self, token: &str) -> AppResult<UserProfile>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    directory: Arc<dyn UserDirectory>,
    tokens: TokenService,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(directory: Arc<dyn UserDirectory>, tokens: TokenService) -> Self {
        Self { directory, tokens }
    }
}

/// Hash on the blocking pool.
async fn hash_password(password: String) -> AppResult<String> {
    let password = tokio::task::spawn_blocking(move || Password::new(&password))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))??;

    Ok(password.into_string())
}

/// Verify on the blocking pool.
async fn verify_password(password: String, stored: Password) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || stored.verify(&password))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))
}

#[async_trait]
impl AuthService for Authenticator {
    async fn signup(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> AppResult<SignupResponse> {
        if self.directory.find_by_username(&username).await?.is_some() {
            debug!(%username, "Signup rejected: username taken");
            return Err(AppError::UsernameTaken);
        }

        let hashed_password = hash_password(password).await?;

        // The lookup above can race with a concurrent signup; the store's
        // unique index settles it.
        let user = self
            .directory
            .insert(NewUser::new(username, email, hashed_password))
            .await
            .map_err(|err| match err {
                AppError::DuplicateUsername => AppError::UsernameTaken,
                other => other,
            })?;

        info!(user_id = user.id, username = %user.username, "User created");

        Ok(SignupResponse {
            message: SIGNUP_SUCCESS_MESSAGE.to_string(),
            user_id: user.id,
        })
    }

    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse> {
        let user = self.directory.find_by_username(&username).await?;

        // SECURITY: verify against a dummy hash when the user is unknown so
        // both failures take the same time and return the same error.
        let stored = match &user {
            Some(user) => Password::from_hash(user.hashed_password.as_str()),
            None => Password::dummy(),
        };
        let password_valid = verify_password(password, stored).await?;

        let user = match user {
            Some(user) if password_valid => user,
            _ => {
                debug!(%username, "Login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        let access_token = self
            .tokens
            .issue(&user.username, self.tokens.default_ttl())?;
        info!(user_id = user.id, username = %user.username, "User logged in");

        Ok(TokenResponse {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
        })
    }

    async fn resolve_current_user(&self, token: &str) -> AppResult<UserProfile> {
        let username = self.tokens.validate(token).map_err(|err| {
            debug!(error = %err, "Access token rejected");
            AppError::Unauthenticated
        })?;

        let user = self
            .directory
            .find_by_username(&username)
            .await?
            .ok_or_else(|| {
                debug!(%username, "Access token subject no longer exists");
                AppError::Unauthenticated
            })?;

        Ok(UserProfile::from(user))
    }
}
