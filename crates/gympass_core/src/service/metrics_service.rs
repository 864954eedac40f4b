//! Per-user metrics use case.

use crate::model::user::UserId;
use crate::repo::check_in_repo::CheckInRepository;
use crate::repo::RepoError;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Aggregated counters for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserMetrics {
    pub check_ins_count: u64,
}

/// Errors from metrics use cases.
#[derive(Debug)]
pub enum MetricsServiceError {
    Repo(RepoError),
}

impl Display for MetricsServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "failed to load user metrics: {err}"),
        }
    }
}

impl Error for MetricsServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for MetricsServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Metrics use-case service.
pub struct MetricsService<C: CheckInRepository> {
    check_ins: C,
}

impl<C: CheckInRepository> MetricsService<C> {
    pub fn new(check_ins: C) -> Self {
        Self { check_ins }
    }

    /// Counts every check-in ever created by `user_id`, validated or not.
    pub fn get_user_metrics(&self, user_id: UserId) -> Result<UserMetrics, MetricsServiceError> {
        let check_ins_count = self.check_ins.count_check_ins_by_user(user_id)?;
        Ok(UserMetrics { check_ins_count })
    }
}
