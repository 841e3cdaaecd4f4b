use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::*;

#[async_trait]
pub trait PositionInbound: Send + Sync {
    /// Appends a position, the store assigns its identity.
    async fn add_position(&self, position: NewPosition) -> Result<Position>;
}

#[async_trait]
pub trait EntityInbound: Send + Sync {
    async fn touch_entity(&self, entity_id: EntityId, liveness: EntityLiveness) -> Result<()>;
}

#[async_trait]
pub trait TripInbound: Send + Sync {
    /// Fails with [`Error::TripInProgress`] if the entity already has an open trip.
    async fn start_trip(&self, entity_id: EntityId, at: DateTime<Utc>) -> Result<Trip>;
    async fn finish_trip(
        &self,
        trip_id: TripId,
        status: TripStatus,
        at: DateTime<Utc>,
    ) -> Result<Trip>;
    /// Returns `None` without writing anything if the trip is no longer in progress.
    async fn update_trip_stats(&self, trip_id: TripId, stats: TripStats) -> Result<Option<Trip>>;
}

#[async_trait]
pub trait AlertInbound: Send + Sync {
    async fn add_alert(&self, alert: NewAlert) -> Result<Alert>;
}

#[async_trait]
pub trait DeliveryInbound: Send + Sync {
    async fn add_delivery_position(
        &self,
        position: NewDeliveryPosition,
    ) -> Result<DeliveryPosition>;
    async fn update_delivery_route(
        &self,
        delivery_id: DeliveryId,
        route: RouteEstimate,
        at: DateTime<Utc>,
    ) -> Result<()>;
}
