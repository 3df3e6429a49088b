use serde::{Deserialize, Serialize};
use std::fmt;

/// Roles recognised by the catalog.
///
/// The order of variants matters: it defines the privilege hierarchy.
/// `Reader` is the least privileged, `Manager` may curate content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Any authenticated caller.
    Reader = 0,
    /// May create, update and delete posts and edit the carousel.
    Manager = 1,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Reader => write!(f, "reader"),
            Role::Manager => write!(f, "manager"),
        }
    }
}

impl Role {
    /// Parse a role from a string (case-insensitive).
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reader" => Some(Role::Reader),
            "manager" => Some(Role::Manager),
            _ => None,
        }
    }

    /// Returns `true` if `self` has at least the required role.
    pub fn has_access(&self, required: Role) -> bool {
        *self >= required
    }
}

/// Claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user identifier.
    pub sub: String,
    /// Role names granted to the subject.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Expiration (Unix seconds).
    pub exp: usize,
    /// Issued at (Unix seconds).
    #[serde(default)]
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// A caller whose bearer token has been verified.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Subject of the token.
    pub user_id: String,
    /// Highest role granted by the token.
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_manager(&self) -> bool {
        self.role.has_access(Role::Manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering() {
        assert!(Role::Manager > Role::Reader);
    }

    #[test]
    fn test_has_access() {
        assert!(Role::Manager.has_access(Role::Manager));
        assert!(Role::Manager.has_access(Role::Reader));
        assert!(Role::Reader.has_access(Role::Reader));
        assert!(!Role::Reader.has_access(Role::Manager));
    }

    #[test]
    fn test_from_str_ci() {
        assert_eq!(Role::from_str_ci("Manager"), Some(Role::Manager));
        assert_eq!(Role::from_str_ci("MANAGER"), Some(Role::Manager));
        assert_eq!(Role::from_str_ci("reader"), Some(Role::Reader));
        assert_eq!(Role::from_str_ci("editor"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Role::Reader.to_string(), "reader");
        assert_eq!(Role::Manager.to_string(), "manager");
    }

    #[test]
    fn test_is_manager() {
        let user = AuthenticatedUser {
            user_id: "u-1".to_string(),
            role: Role::Reader,
        };
        assert!(!user.is_manager());

        let manager = AuthenticatedUser {
            role: Role::Manager,
            ..user
        };
        assert!(manager.is_manager());
    }
}
