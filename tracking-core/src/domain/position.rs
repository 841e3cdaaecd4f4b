use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::coordinate::ensure_finite;
use crate::{
    Coordinate, EntityId, PositionId, TripId, ValidationError,
    validation_error::{AccuracySnafu, BatteryLevelSnafu, HeadingSnafu, SpeedSnafu},
};

/// A stored, immutable position of a tracked entity.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: PositionId,
    pub entity_id: EntityId,
    pub coordinate: Coordinate,
    pub altitude: Option<f64>,
    /// Velocity magnitude in km/h.
    pub speed: Option<f64>,
    /// Degrees, 0 to 360.
    pub heading: Option<f64>,
    /// Radius estimate in meters.
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub trip_id: Option<TripId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPosition {
    pub entity_id: EntityId,
    pub coordinate: Coordinate,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub trip_id: Option<TripId>,
}

/// A position report as sent by device software.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionReport {
    pub entity_id: EntityId,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub accuracy: Option<f64>,
    /// Percentage, 0 to 100.
    pub battery_level: Option<f64>,
    /// Defaults to the time of ingestion when absent.
    pub timestamp: Option<DateTime<Utc>>,
}

/// The motion fields shared by entity and delivery reports.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Motion {
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub accuracy: Option<f64>,
}

impl PositionReport {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.coordinate().validate()?;
        Motion {
            speed: self.speed,
            heading: self.heading,
            accuracy: self.accuracy,
        }
        .validate()?;

        if let Some(altitude) = self.altitude {
            ensure_finite("altitude", altitude)?;
        }
        if let Some(battery_level) = self.battery_level {
            ensure_finite("batteryLevel", battery_level)?;
            if !(0.0..=100.0).contains(&battery_level) {
                return BatteryLevelSnafu {
                    value: battery_level,
                }
                .fail();
            }
        }

        Ok(())
    }

    pub fn into_new_position(
        self,
        trip_id: Option<TripId>,
        received_at: DateTime<Utc>,
    ) -> NewPosition {
        NewPosition {
            entity_id: self.entity_id,
            coordinate: self.coordinate(),
            altitude: self.altitude,
            speed: self.speed,
            heading: self.heading,
            accuracy: self.accuracy,
            timestamp: self.timestamp.unwrap_or(received_at),
            trip_id,
        }
    }
}

impl Motion {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(speed) = self.speed {
            ensure_finite("speed", speed)?;
            if speed < 0.0 {
                return SpeedSnafu { value: speed }.fail();
            }
        }
        if let Some(heading) = self.heading {
            ensure_finite("heading", heading)?;
            if !(0.0..=360.0).contains(&heading) {
                return HeadingSnafu { value: heading }.fail();
            }
        }
        if let Some(accuracy) = self.accuracy {
            ensure_finite("accuracy", accuracy)?;
            if accuracy < 0.0 {
                return AccuracySnafu { value: accuracy }.fail();
            }
        }
        Ok(())
    }
}
