use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracking_core::{Coordinate, EntityId, PositionId, TripId};

#[derive(Debug, Clone, FromRow)]
pub struct Position {
    pub position_id: PositionId,
    pub entity_id: EntityId,
    pub trip_id: Option<TripId>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl From<Position> for tracking_core::Position {
    fn from(v: Position) -> Self {
        let Position {
            position_id,
            entity_id,
            trip_id,
            latitude,
            longitude,
            altitude,
            speed,
            heading,
            accuracy,
            timestamp,
        } = v;

        Self {
            id: position_id,
            entity_id,
            coordinate: Coordinate::new(latitude, longitude),
            altitude,
            speed,
            heading,
            accuracy,
            timestamp,
            trip_id,
        }
    }
}
