//! Gym creation and discovery use cases.

use crate::geo::Coordinate;
use crate::model::gym::Gym;
use crate::model::validation::ValidationError;
use crate::repo::gym_repo::GymRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Radius used by `fetch_nearby_gyms`.
pub const NEARBY_GYMS_RADIUS_KM: f64 = 10.0;

/// Errors from gym use cases.
#[derive(Debug)]
pub enum GymServiceError {
    Validation(ValidationError),
    Repo(RepoError),
}

impl Display for GymServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GymServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for GymServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for GymServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Gym creation input. Blank optional fields are stored as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateGymRequest {
    pub title: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Gym use-case service.
pub struct GymService<G: GymRepository> {
    repo: G,
}

impl<G: GymRepository> GymService<G> {
    pub fn new(repo: G) -> Self {
        Self { repo }
    }

    pub fn create_gym(&self, request: &CreateGymRequest) -> Result<Gym, GymServiceError> {
        let mut gym = Gym::new(request.title.trim(), request.latitude, request.longitude);
        gym.description = non_blank(request.description.as_deref());
        gym.phone = non_blank(request.phone.as_deref());

        self.repo.create_gym(&gym)?;
        info!("event=gym_create module=service status=ok gym_id={}", gym.id);
        Ok(gym)
    }

    /// Case-insensitive title search, 20 gyms per 1-based page.
    pub fn search_gyms(&self, query: &str, page: u32) -> Result<Vec<Gym>, GymServiceError> {
        Ok(self.repo.search_gyms(query, page)?)
    }

    /// Gyms within `NEARBY_GYMS_RADIUS_KM` of the user, nearest first.
    pub fn fetch_nearby_gyms(&self, user: Coordinate) -> Result<Vec<Gym>, GymServiceError> {
        user.validate()?;
        Ok(self.repo.find_gyms_nearby(user, NEARBY_GYMS_RADIUS_KM)?)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
