//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_COACH, ROLE_USER};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Coach,
    Admin,
}

impl UserRole {
    /// Check if this role is a coach
    pub fn is_coach(&self) -> bool {
        matches!(self, UserRole::Coach)
    }

    /// Only USER -> COACH is a legal transition
    pub fn can_promote_to_coach(&self) -> bool {
        matches!(self, UserRole::User)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => ROLE_USER,
            UserRole::Coach => ROLE_COACH,
            UserRole::Admin => ROLE_ADMIN,
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_COACH => UserRole::Coach,
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_coach(&self) -> bool {
        self.role.is_coach()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_column_value() {
        for role in [UserRole::User, UserRole::Coach, UserRole::Admin] {
            let stored: String = role.into();
            assert_eq!(UserRole::from(stored.as_str()), role);
        }
        // Unknown values fall back to the least privileged role
        assert_eq!(UserRole::from("superuser"), UserRole::User);
    }

    #[test]
    fn test_only_users_can_be_promoted() {
        assert!(UserRole::User.can_promote_to_coach());
        assert!(!UserRole::Coach.can_promote_to_coach());
        assert!(!UserRole::Admin.can_promote_to_coach());
    }

    #[test]
    fn test_password_never_serialized() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: "Lee".to_string(),
            email: "lee@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: UserRole::Coach,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "COACH");
    }
}
