use geo::Point;
use serde::{Deserialize, Serialize};

use crate::{
    ValidationError,
    validation_error::{LatitudeSnafu, LongitudeSnafu, NotFiniteSnafu},
};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
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
        ensure_finite("latitude", self.latitude)?;
        ensure_finite("longitude", self.longitude)?;

        if !(-90.0..=90.0).contains(&self.latitude) {
            return LatitudeSnafu {
                value: self.latitude,
            }
            .fail();
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return LongitudeSnafu {
                value: self.longitude,
            }
            .fail();
        }

        Ok(())
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(value: Coordinate) -> Self {
        Point::new(value.longitude, value.latitude)
    }
}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        NotFiniteSnafu { field, value }.fail()
    }
}
