//! Gym domain model.

use crate::geo::Coordinate;
use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a gym.
pub type GymId = Uuid;

/// Gym that members can check in at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gym {
    pub id: GymId,
    pub title: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Gym {
    /// Creates a gym with a generated id and no optional details.
    pub fn new(title: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self::with_id(Uuid::new_v4(), title, latitude, longitude)
    }

    /// Creates a gym with a caller-provided id.
    pub fn with_id(id: GymId, title: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            phone: None,
            latitude,
            longitude,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        self.coordinate().validate()
    }
}
