//! User domain model.
//!
//! # Invariants
//! - `email` is stored normalized (trimmed, lowercase) and is unique.
//! - `password_hash` is a bcrypt hash, never the raw password.

use crate::model::validation::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Stable identifier for a registered user.
pub type UserId = Uuid;

/// Registered gym member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Never serialized to callers.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Registration time in epoch milliseconds.
    pub created_at: i64,
}

impl User {
    /// Creates a user with a generated id. `email` is normalized.
    pub fn new(
        name: impl Into<String>,
        email: &str,
        password_hash: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: normalize_email(email),
            password_hash: password_hash.into(),
            created_at,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        if !EMAIL_RE.is_match(&self.email) {
            return Err(ValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

/// Canonical email form used for storage and uniqueness lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{normalize_email, User};
    use crate::model::validation::ValidationError;

    #[test]
    fn new_user_normalizes_email() {
        let user = User::new("John Doe", "  JohnDoe@Example.com ", "hash", 0);
        assert_eq!(user.email, "johndoe@example.com");
        assert!(user.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_name_and_bad_email() {
        let blank = User::new("   ", "john@example.com", "hash", 0);
        assert_eq!(blank.validate(), Err(ValidationError::BlankName));

        let bad_email = User::new("John", "not-an-email", "hash", 0);
        assert!(matches!(
            bad_email.validate(),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn normalize_email_is_idempotent() {
        let once = normalize_email(" A@B.io ");
        assert_eq!(normalize_email(&once), once);
    }
}
