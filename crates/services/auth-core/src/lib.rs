//! Auth Core Library
//!
//! Signup, login and bearer-token resolution on top of the user directory.
//! The crate is transport-agnostic: it returns plain response structures or
//! an `AppError` and leaves HTTP concerns to the gateway.

pub mod config;
pub mod service;
pub mod token;

use std::sync::Arc;

use user_directory::UserDirectory;

pub use crate::config::AuthConfig;
pub use crate::service::{AuthService, Authenticator, SignupResponse, TokenResponse};
pub use crate::token::{Claims, Clock, SystemClock, TokenError, TokenService};

/// Build an authenticator that reads the wall clock.
pub fn build_authenticator(config: &AuthConfig, directory: Arc<dyn UserDirectory>) -> Authenticator {
    Authenticator::new(directory, TokenService::new(config))
}
