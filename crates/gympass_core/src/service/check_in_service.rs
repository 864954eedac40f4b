//! Check-in and check-in validation use cases.
//!
//! # Responsibility
//! - Gate check-ins on gym existence, distance and the once-per-day rule.
//! - Confirm check-ins inside the validation window.
//!
//! # Invariants
//! - A user has at most one check-in per gym per UTC calendar day.
//! - `validated_at` is set at most once, and only while the check-in age is
//!   within `CheckInRules::validation_window`.

use crate::clock::{utc_date, Clock, SystemClock};
use crate::geo::{distance_km, Coordinate};
use crate::model::check_in::{CheckIn, CheckInId};
use crate::model::gym::GymId;
use crate::model::user::UserId;
use crate::model::validation::ValidationError;
use crate::repo::check_in_repo::CheckInRepository;
use crate::repo::gym_repo::GymRepository;
use crate::repo::RepoError;
use chrono::Duration;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Thresholds for check-in business rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckInRules {
    /// Maximum great-circle distance between user and gym.
    pub max_distance_km: f64,
    /// How long after creation a check-in may still be validated.
    pub validation_window: Duration,
}

impl Default for CheckInRules {
    fn default() -> Self {
        Self {
            max_distance_km: 0.1,
            validation_window: Duration::minutes(20),
        }
    }
}

/// Errors from check-in use cases.
#[derive(Debug)]
pub enum CheckInServiceError {
    GymNotFound(GymId),
    UserNotFound(UserId),
    CheckInNotFound(CheckInId),
    /// User is farther from the gym than `max_distance_km`.
    MaxDistanceReached {
        distance_km: f64,
        max_distance_km: f64,
    },
    /// User already checked in at this gym today.
    MaxNumberOfCheckInsReached { existing: CheckInId },
    /// Validation attempted after the validation window closed.
    LateCheckInValidation { window_minutes: i64 },
    AlreadyValidated(CheckInId),
    Validation(ValidationError),
    Repo(RepoError),
}

impl CheckInServiceError {
    pub fn is_resource_not_found(&self) -> bool {
        matches!(
            self,
            Self::GymNotFound(_) | Self::UserNotFound(_) | Self::CheckInNotFound(_)
        )
    }
}

impl Display for CheckInServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GymNotFound(id) => write!(f, "resource not found: gym {id}"),
            Self::UserNotFound(id) => write!(f, "resource not found: user {id}"),
            Self::CheckInNotFound(id) => write!(f, "resource not found: check-in {id}"),
            Self::MaxDistanceReached {
                distance_km,
                max_distance_km,
            } => write!(
                f,
                "max distance reached: gym is {distance_km:.3} km away, limit is {max_distance_km} km"
            ),
            Self::MaxNumberOfCheckInsReached { existing } => write!(
                f,
                "max number of check-ins reached: already checked in today ({existing})"
            ),
            Self::LateCheckInValidation { window_minutes } => write!(
                f,
                "the check-in can only be validated until {window_minutes} minutes after its creation"
            ),
            Self::AlreadyValidated(id) => write!(f, "check-in already validated: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CheckInServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CheckInServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { id, .. } => Self::CheckInNotFound(id),
            RepoError::MissingReference { entity: "gym", id } => Self::GymNotFound(id),
            RepoError::MissingReference { entity: "user", id } => Self::UserNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for CheckInServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Check-in input: who, where, and the user's reported position.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckInRequest {
    pub user_id: UserId,
    pub gym_id: GymId,
    pub user_latitude: f64,
    pub user_longitude: f64,
}

/// Check-in use-case service.
pub struct CheckInService<C: CheckInRepository, G: GymRepository, T: Clock = SystemClock> {
    check_ins: C,
    gyms: G,
    clock: T,
    rules: CheckInRules,
}

impl<C: CheckInRepository, G: GymRepository> CheckInService<C, G, SystemClock> {
    pub fn new(check_ins: C, gyms: G) -> Self {
        Self::with_clock(check_ins, gyms, SystemClock)
    }
}

impl<C: CheckInRepository, G: GymRepository, T: Clock> CheckInService<C, G, T> {
    pub fn with_clock(check_ins: C, gyms: G, clock: T) -> Self {
        Self {
            check_ins,
            gyms,
            clock,
            rules: CheckInRules::default(),
        }
    }

    /// Replaces the default thresholds.
    pub fn with_rules(mut self, rules: CheckInRules) -> Self {
        self.rules = rules;
        self
    }

    /// Thresholds currently enforced by this service.
    pub fn rules(&self) -> CheckInRules {
        self.rules
    }

    /// Creates a check-in for a user standing near a gym.
    ///
    /// # Contract
    /// - `GymNotFound` when the gym does not exist.
    /// - `UserNotFound` when the store enforces references and the user is
    ///   unknown.
    /// - `MaxDistanceReached` when the user is farther than the limit.
    /// - `MaxNumberOfCheckInsReached` on a second check-in at the same gym on
    ///   the same UTC day.
    pub fn check_in(&self, request: &CheckInRequest) -> Result<CheckIn, CheckInServiceError> {
        let user_position = Coordinate::new(request.user_latitude, request.user_longitude);
        user_position.validate()?;

        let gym = self
            .gyms
            .find_gym_by_id(request.gym_id)?
            .ok_or(CheckInServiceError::GymNotFound(request.gym_id))?;

        let distance = distance_km(user_position, gym.coordinate());
        if distance > self.rules.max_distance_km {
            warn!(
                "event=check_in_create module=service status=rejected reason=max_distance gym_id={} distance_km={:.3}",
                gym.id, distance
            );
            return Err(CheckInServiceError::MaxDistanceReached {
                distance_km: distance,
                max_distance_km: self.rules.max_distance_km,
            });
        }

        let now = self.clock.now_ms();
        if let Some(existing) =
            self.check_ins
                .find_check_in_on_day(request.user_id, gym.id, utc_date(now))?
        {
            warn!(
                "event=check_in_create module=service status=rejected reason=same_day gym_id={} user_id={}",
                gym.id, request.user_id
            );
            return Err(CheckInServiceError::MaxNumberOfCheckInsReached {
                existing: existing.id,
            });
        }

        let check_in = CheckIn::new(gym.id, request.user_id, now);
        self.check_ins.create_check_in(&check_in)?;
        info!(
            "event=check_in_create module=service status=ok check_in_id={} gym_id={} user_id={}",
            check_in.id, check_in.gym_id, check_in.user_id
        );
        Ok(check_in)
    }

    /// Confirms a check-in while its validation window is open.
    pub fn validate_check_in(
        &self,
        check_in_id: CheckInId,
    ) -> Result<CheckIn, CheckInServiceError> {
        let mut check_in = self
            .check_ins
            .find_check_in_by_id(check_in_id)?
            .ok_or(CheckInServiceError::CheckInNotFound(check_in_id))?;

        if check_in.is_validated() {
            return Err(CheckInServiceError::AlreadyValidated(check_in_id));
        }

        let now = self.clock.now_ms();
        if check_in.age_ms(now) > self.rules.validation_window.num_milliseconds() {
            warn!(
                "event=check_in_validate module=service status=rejected reason=late check_in_id={check_in_id}"
            );
            return Err(CheckInServiceError::LateCheckInValidation {
                window_minutes: self.rules.validation_window.num_minutes(),
            });
        }

        check_in.validated_at = Some(now);
        self.check_ins.save_check_in(&check_in)?;
        info!("event=check_in_validate module=service status=ok check_in_id={check_in_id}");
        Ok(check_in)
    }

    /// One page of a user's check-ins, newest first.
    pub fn fetch_user_check_ins_history(
        &self,
        user_id: UserId,
        page: u32,
    ) -> Result<Vec<CheckIn>, CheckInServiceError> {
        Ok(self.check_ins.list_check_ins_by_user(user_id, page)?)
    }
}
