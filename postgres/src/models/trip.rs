use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracking_core::{EntityId, TripId, TripStats};

use super::parse_column;
use crate::error::{Error, Result};

#[derive(Debug, Clone, FromRow)]
pub struct Trip {
    pub trip_id: TripId,
    pub entity_id: EntityId,
    pub status: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub avg_speed: f64,
    pub max_speed: f64,
}

impl TryFrom<Trip> for tracking_core::Trip {
    type Error = Error;

    fn try_from(v: Trip) -> Result<Self> {
        let Trip {
            trip_id,
            entity_id,
            status,
            start_time,
            end_time,
            distance_km,
            duration_minutes,
            avg_speed,
            max_speed,
        } = v;

        Ok(Self {
            id: trip_id,
            entity_id,
            status: parse_column("trips.status", status)?,
            start_time,
            end_time,
            stats: TripStats {
                distance_km,
                duration_minutes,
                avg_speed,
                max_speed,
            },
        })
    }
}
