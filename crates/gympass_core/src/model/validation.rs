//! Field-level validation errors for domain records.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure raised by `validate()` on domain records.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// User name is blank after trim.
    BlankName,
    /// Email does not look like `local@domain.tld`.
    InvalidEmail(String),
    /// Gym title is blank after trim.
    BlankTitle,
    /// Latitude outside `[-90, 90]` or not finite.
    LatitudeOutOfRange(f64),
    /// Longitude outside `[-180, 180]` or not finite.
    LongitudeOutOfRange(f64),
    /// `validated_at` is earlier than `created_at`.
    ValidatedBeforeCreated { created_at: i64, validated_at: i64 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "user name must not be blank"),
            Self::InvalidEmail(value) => write!(f, "invalid email: `{value}`"),
            Self::BlankTitle => write!(f, "gym title must not be blank"),
            Self::LatitudeOutOfRange(value) => {
                write!(f, "latitude {value} is outside [-90, 90]")
            }
            Self::LongitudeOutOfRange(value) => {
                write!(f, "longitude {value} is outside [-180, 180]")
            }
            Self::ValidatedBeforeCreated {
                created_at,
                validated_at,
            } => write!(
                f,
                "validated_at {validated_at} is earlier than created_at {created_at}"
            ),
        }
    }
}

impl Error for ValidationError {}
