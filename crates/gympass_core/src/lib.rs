//! Core domain logic for GymPass check-ins.
//! This crate is the single source of truth for business invariants.

pub mod clock;
pub mod db;
pub mod geo;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use geo::{distance_km, Coordinate, GeoBounds};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::check_in::{CheckIn, CheckInId};
pub use model::gym::{Gym, GymId};
pub use model::user::{User, UserId};
pub use model::validation::ValidationError;
pub use repo::check_in_repo::{CheckInRepository, SqliteCheckInRepository};
pub use repo::gym_repo::{GymRepository, SqliteGymRepository};
pub use repo::memory::{InMemoryCheckInRepository, InMemoryGymRepository, InMemoryUserRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult, PAGE_SIZE};
pub use service::check_in_service::{
    CheckInRequest, CheckInRules, CheckInService, CheckInServiceError,
};
pub use service::gym_service::{CreateGymRequest, GymService, GymServiceError};
pub use service::metrics_service::{MetricsService, MetricsServiceError, UserMetrics};
pub use service::user_service::{RegisterRequest, UserService, UserServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
