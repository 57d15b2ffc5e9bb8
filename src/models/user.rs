//! Auth user and session models
//!
//! Both are issued by the auth provider; the client only reads them and keeps
//! the session around so later requests can be authorized.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Metadata attached to the account at sign-up
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub username: Option<String>,
}

/// An authenticated user as reported by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl User {
    /// Username from sign-up metadata, falling back to the local part of the email
    pub fn display_name(&self) -> &str {
        match self.user_metadata.username.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.email.split('@').next().unwrap_or("user"),
        }
    }
}

/// Seconds before expiry at which a session should be refreshed
pub const REFRESH_MARGIN_SECS: i64 = 60;

/// A signed-in session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) when the access token expires
    pub expires_at: i64,
    pub user: User,
}

impl Session {
    /// Check if the access token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.expires_at
    }

    /// Check if the access token is close enough to expiry to refresh
    pub fn needs_refresh(&self) -> bool {
        Utc::now().timestamp() + REFRESH_MARGIN_SECS >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, username: Option<&str>) -> User {
        User {
            id: UserId::new(),
            email: email.into(),
            user_metadata: UserMetadata {
                username: username.map(str::to_string),
            },
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(user("asha@example.com", Some("asha_k")).display_name(), "asha_k");
        assert_eq!(user("asha@example.com", None).display_name(), "asha");
        assert_eq!(user("asha@example.com", Some("")).display_name(), "asha");
    }

    #[test]
    fn test_refresh_window() {
        let now = Utc::now().timestamp();
        let mut session = Session {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at: now + 3600,
            user: user("a@b.c", None),
        };
        assert!(!session.needs_refresh());
        assert!(!session.is_expired());

        session.expires_at = now + 30;
        assert!(session.needs_refresh());
        assert!(!session.is_expired());

        session.expires_at = now - 1;
        assert!(session.is_expired());
    }

    #[test]
    fn test_user_from_provider_json() {
        let json = serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "aud": "authenticated",
            "email": "asha@example.com",
            "user_metadata": { "username": "asha" },
            "app_metadata": { "provider": "email" }
        });
        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.display_name(), "asha");
    }
}
