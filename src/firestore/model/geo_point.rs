use std::cmp::Ordering;

use crate::firestore::error::{invalid_argument, FirestoreResult};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> FirestoreResult<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid_argument(format!(
                "Latitude must be between -90 and 90 degrees, got {latitude}"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid_argument(format!(
                "Longitude must be between -180 and 180 degrees, got {longitude}"
            )));
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Latitude first, then longitude. Coordinates are range-checked so NaN never appears.
    pub fn compare(&self, other: &Self) -> Ordering {
        let latitude = self.latitude.partial_cmp(&other.latitude);
        let longitude = self.longitude.partial_cmp(&other.longitude);
        latitude
            .unwrap_or(Ordering::Equal)
            .then(longitude.unwrap_or(Ordering::Equal))
    }
}
