/// User domain type
use crate::error::{Result, RosterError};
use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Login name (unique, compared case-insensitively)
    pub username: String,

    pub email: String,

    /// Managers may administer employees and author feedback
    pub is_manager: bool,

    /// Account creation timestamp (ISO string)
    pub created_at: String,
}

/// Data for creating a new user
///
/// The password must already be hashed; hashing belongs to the auth service.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_manager: bool,
}

impl CreateUser {
    /// Check the fields a store cannot check for us
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(RosterError::validation("username", "is required"));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(RosterError::validation("email", "must be an email address"));
        }
        if self.password_hash.is_empty() {
            return Err(RosterError::validation("password", "is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_user(username: &str, email: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$2b$04$hash".to_string(),
            is_manager: false,
        }
    }

    #[test]
    fn blank_username_is_rejected() {
        let err = create_user("  ", "a@example.com").validate().unwrap_err();
        assert!(matches!(err, RosterError::Validation { ref field, .. } if field == "username"));
    }

    #[test]
    fn email_needs_an_at_sign() {
        assert!(create_user("vinod", "vinod.example.com").validate().is_err());
        assert!(create_user("vinod", "vinod@example.com").validate().is_ok());
    }
}
