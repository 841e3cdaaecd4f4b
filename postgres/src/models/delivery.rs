use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracking_core::{Coordinate, DeliveryId, DeliveryPositionId, OrderId, RouteEstimate};

use super::parse_column;
use crate::error::{Error, Result};

#[derive(Debug, Clone, FromRow)]
pub struct Delivery {
    pub delivery_id: DeliveryId,
    pub order_id: OrderId,
    pub destination_latitude: f64,
    pub destination_longitude: f64,
    pub status: String,
    pub route_distance_meters: Option<f64>,
    pub route_duration_seconds: Option<f64>,
    pub eta_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DeliveryPosition {
    pub delivery_position_id: DeliveryPositionId,
    pub delivery_id: DeliveryId,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl TryFrom<Delivery> for tracking_core::Delivery {
    type Error = Error;

    fn try_from(v: Delivery) -> Result<Self> {
        let Delivery {
            delivery_id,
            order_id,
            destination_latitude,
            destination_longitude,
            status,
            route_distance_meters,
            route_duration_seconds,
            eta_updated_at,
        } = v;

        let route = match (route_distance_meters, route_duration_seconds) {
            (Some(distance_meters), Some(duration_seconds)) => Some(RouteEstimate {
                distance_meters,
                duration_seconds,
            }),
            _ => None,
        };

        Ok(Self {
            id: delivery_id,
            order_id,
            destination: Coordinate::new(destination_latitude, destination_longitude),
            status: parse_column("deliveries.status", status)?,
            route,
            eta_updated_at,
        })
    }
}

impl From<DeliveryPosition> for tracking_core::DeliveryPosition {
    fn from(v: DeliveryPosition) -> Self {
        Self {
            id: v.delivery_position_id,
            delivery_id: v.delivery_id,
            coordinate: Coordinate::new(v.latitude, v.longitude),
            speed: v.speed,
            heading: v.heading,
            accuracy: v.accuracy,
            timestamp: v.timestamp,
        }
    }
}
