//! Great-circle distance helpers.
//!
//! # Invariants
//! - Distances are computed on a sphere of radius `EARTH_RADIUS_KM`.
//! - Distance is symmetric and zero for identical coordinates.

use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ValidationError::LatitudeOutOfRange(self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ValidationError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }
}

/// Haversine distance between two coordinates in kilometers.
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    if from == to {
        return 0.0;
    }

    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}

/// Coarse latitude/longitude window around a center point.
///
/// Longitude ranges never cross ±180°: a window spanning the antimeridian is
/// split in two, and a window touching a pole covers every longitude.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub longitude_ranges: Vec<(f64, f64)>,
}

impl GeoBounds {
    pub fn contains(&self, point: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.latitude)
            && self
                .longitude_ranges
                .iter()
                .any(|(min, max)| (*min..=*max).contains(&point.longitude))
    }
}

/// Window containing every point within `radius_km` of `center`.
///
/// Used as a SQL pre-filter; callers must still apply `distance_km`.
pub fn bounding_box(center: Coordinate, radius_km: f64) -> GeoBounds {
    let lat_change = radius_km / 111.0;
    let min_lat = center.latitude - lat_change;
    let max_lat = center.latitude + lat_change;

    if min_lat <= -90.0 || max_lat >= 90.0 {
        return GeoBounds {
            min_lat: min_lat.max(-90.0),
            max_lat: max_lat.min(90.0),
            longitude_ranges: vec![(-180.0, 180.0)],
        };
    }

    // Meridians converge poleward, so size the window at the edge nearest a pole.
    let widest_lat = min_lat.abs().max(max_lat.abs());
    let lon_change = lat_change / widest_lat.to_radians().cos();
    let longitude_ranges = if lon_change >= 180.0 {
        vec![(-180.0, 180.0)]
    } else {
        let min_lon = center.longitude - lon_change;
        let max_lon = center.longitude + lon_change;
        if min_lon < -180.0 {
            vec![(min_lon + 360.0, 180.0), (-180.0, max_lon)]
        } else if max_lon > 180.0 {
            vec![(min_lon, 180.0), (-180.0, max_lon - 360.0)]
        } else {
            vec![(min_lon, max_lon)]
        }
    };

    GeoBounds {
        min_lat,
        max_lat,
        longitude_ranges,
    }
}
