use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{EntityId, TripId};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: TripId,
    pub entity_id: EntityId,
    pub status: TripStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub stats: TripStats,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, AsRefStr, EnumString, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "snake_case")]
pub enum TripStatus {
    InProgress,
    Completed,
    Cancelled,
}

/// Summary statistics derived from the positions of a trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripStats {
    pub distance_km: f64,
    pub duration_minutes: f64,
    /// Mean of the reported speeds, km/h.
    pub avg_speed: f64,
    /// Highest reported speed, km/h.
    pub max_speed: f64,
}

impl Trip {
    pub fn is_in_progress(&self) -> bool {
        self.status == TripStatus::InProgress
    }
}
