//! User entity for the authentication collaborator.

use serde::{Deserialize, Serialize};

/// Role of the authenticated account. Integer-encoded on the wire.
///
/// Values this client does not know degrade to `User` instead of failing
/// the whole response, so a backend that grows new roles cannot lock
/// existing sessions out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum UserRole {
    User,
    Vendor,
}

impl From<u8> for UserRole {
    fn from(value: u8) -> Self {
        match value {
            1 => UserRole::Vendor,
            _ => UserRole::User,
        }
    }
}

impl From<UserRole> for u8 {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::User => 0,
            UserRole::Vendor => 1,
        }
    }
}

/// Authenticated account as returned by `GET /me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl User {
    /// Returns true if the account manages products and fulfills orders.
    pub fn is_vendor(&self) -> bool {
        self.role == UserRole::Vendor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        let user: User =
            serde_json::from_str(r#"{"id":1,"email":"a@b.c","name":"A","role":1}"#).unwrap();
        assert!(user.is_vendor());
        assert_eq!(
            serde_json::to_string(&user.role).unwrap(),
            "1"
        );
    }

    #[test]
    fn test_unknown_role_defaults_to_user() {
        let user: User =
            serde_json::from_str(r#"{"id":1,"email":"a@b.c","name":"A","role":5}"#).unwrap();
        assert_eq!(user.role, UserRole::User);
        assert!(!user.is_vendor());
    }
}
