//! Domain-level constants.
//!
//! These constants define authentication rules and the fixed wire values
//! shared by every layer.

// =============================================================================
// Authentication
// =============================================================================

/// Default access token lifetime in minutes
pub const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;

/// Upper bound on the access token lifetime in minutes (one year)
pub const MAX_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 525_600;

/// Default token signing algorithm identifier
pub const DEFAULT_TOKEN_ALGORITHM: &str = "HS256";

/// Minimum signing secret length in bytes (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Authorization scheme name for bearer tokens
pub const BEARER_SCHEME: &str = "Bearer";

/// Token type reported to clients after login
pub const TOKEN_TYPE_BEARER: &str = "bearer";

// =============================================================================
// Signup
// =============================================================================

/// Message returned on successful signup
pub const SIGNUP_SUCCESS_MESSAGE: &str = "User created successfully";

/// Maximum username length accepted at signup
pub const MAX_USERNAME_LENGTH: usize = 64;
