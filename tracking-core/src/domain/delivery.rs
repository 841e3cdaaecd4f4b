use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{Coordinate, DeliveryId, DeliveryPositionId, Motion, OrderId, ValidationError};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: DeliveryId,
    pub order_id: OrderId,
    pub destination: Coordinate,
    pub status: DeliveryStatus,
    pub route: Option<RouteEstimate>,
    pub eta_updated_at: Option<DateTime<Utc>>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, AsRefStr, EnumString, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "snake_case")]
pub enum DeliveryStatus {
    Assigned,
    InTransit,
    Delivered,
    Cancelled,
}

/// Remaining distance and travel time reported by the routing service.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEstimate {
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPosition {
    pub id: DeliveryPositionId,
    pub delivery_id: DeliveryId,
    pub coordinate: Coordinate,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDeliveryPosition {
    pub delivery_id: DeliveryId,
    pub coordinate: Coordinate,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// A courier position report for one delivery.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPositionReport {
    pub latitude: f64,
    pub longitude: f64,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub accuracy: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Delivery {
    pub fn accepts_positions(&self) -> bool {
        !matches!(
            self.status,
            DeliveryStatus::Delivered | DeliveryStatus::Cancelled
        )
    }
}

impl DeliveryPositionReport {
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
        .validate()
    }

    pub fn into_new_position(
        self,
        delivery_id: DeliveryId,
        received_at: DateTime<Utc>,
    ) -> NewDeliveryPosition {
        NewDeliveryPosition {
            delivery_id,
            coordinate: self.coordinate(),
            speed: self.speed,
            heading: self.heading,
            accuracy: self.accuracy,
            timestamp: self.timestamp.unwrap_or(received_at),
        }
    }
}
