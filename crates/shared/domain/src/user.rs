//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User domain entity
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub profile_pic: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Don't expose the hash in debug output
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("hashed_password", &"[REDACTED]")
            .field("profile_pic", &self.profile_pic)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Fields required to register a user. The password is already hashed.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub hashed_password: String,
}

impl NewUser {
    pub fn new(username: String, email: String, hashed_password: String) -> Self {
        Self {
            username,
            email,
            hashed_password,
        }
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("hashed_password", &"[REDACTED]")
            .finish()
    }
}

/// User profile (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserProfile {
    /// Unique user identifier
    #[cfg_attr(feature = "openapi", schema(example = 1))]
    pub id: i32,
    /// Unique login name
    #[cfg_attr(feature = "openapi", schema(example = "alice"))]
    pub username: String,
    /// User email address
    #[cfg_attr(feature = "openapi", schema(example = "a@x.com"))]
    pub email: String,
    /// Optional profile picture reference
    #[cfg_attr(feature = "openapi", schema(example = "https://cdn.example.com/alice.png"))]
    pub profile_pic: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            profile_pic: user.profile_pic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            hashed_password: "$argon2id$secret".to_string(),
            profile_pic: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_serialization_skips_hash() {
        let json = serde_json::to_value(alice()).unwrap();
        assert!(json.get("hashed_password").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn test_user_debug_redacts_hash() {
        let debug = format!("{:?}", alice());
        assert!(!debug.contains("$argon2id$secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_profile_shape() {
        let profile = UserProfile::from(alice());
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "username": "alice",
                "email": "a@x.com",
                "profile_pic": null,
            })
        );
    }
}
