//! Check-in domain model.
//!
//! # Invariants
//! - `validated_at` is set at most once and never precedes `created_at`.

use crate::model::gym::GymId;
use crate::model::user::UserId;
use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a check-in.
pub type CheckInId = Uuid;

/// Record of one user attending one gym.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: CheckInId,
    pub gym_id: GymId,
    pub user_id: UserId,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
    /// Validation time in epoch milliseconds, once confirmed.
    pub validated_at: Option<i64>,
}

impl CheckIn {
    /// Creates an unvalidated check-in with a generated id.
    pub fn new(gym_id: GymId, user_id: UserId, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            gym_id,
            user_id,
            created_at,
            validated_at: None,
        }
    }

    pub fn is_validated(&self) -> bool {
        self.validated_at.is_some()
    }

    /// Milliseconds elapsed between creation and `now_ms`.
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.created_at)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.validated_at {
            Some(validated_at) if validated_at < self.created_at => {
                Err(ValidationError::ValidatedBeforeCreated {
                    created_at: self.created_at,
                    validated_at,
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CheckIn;
    use crate::model::validation::ValidationError;
    use uuid::Uuid;

    #[test]
    fn validated_at_must_not_precede_creation() {
        let mut check_in = CheckIn::new(Uuid::new_v4(), Uuid::new_v4(), 5_000);
        assert!(!check_in.is_validated());
        check_in.validated_at = Some(4_000);
        assert_eq!(
            check_in.validate(),
            Err(ValidationError::ValidatedBeforeCreated {
                created_at: 5_000,
                validated_at: 4_000,
            })
        );
    }

    #[test]
    fn serializes_with_snake_case_fields() {
        let check_in = CheckIn::new(Uuid::nil(), Uuid::nil(), 1);
        let json = serde_json::to_value(&check_in).unwrap();
        assert_eq!(json["created_at"], 1);
        assert!(json["validated_at"].is_null());
        assert!(json.get("gym_id").is_some());
    }
}
