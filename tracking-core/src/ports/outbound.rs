use async_trait::async_trait;

use crate::*;

#[async_trait]
pub trait PositionOutbound: Send + Sync {
    /// Ordered by timestamp, ties broken by id.
    async fn positions_of_trip(&self, trip_id: TripId) -> Result<Vec<Position>>;
    /// The most recent position of the entity that arrived before `before`.
    async fn previous_position(
        &self,
        entity_id: EntityId,
        before: PositionId,
    ) -> Result<Option<Position>>;
    async fn latest_position(&self, entity_id: EntityId) -> Result<Option<Position>>;
}

#[async_trait]
pub trait EntityOutbound: Send + Sync {
    async fn entity(&self, entity_id: EntityId) -> Result<Option<Entity>>;
}

#[async_trait]
pub trait TripOutbound: Send + Sync {
    async fn current_trip(&self, entity_id: EntityId) -> Result<Option<Trip>>;
    async fn trip(&self, trip_id: TripId) -> Result<Option<Trip>>;
}

#[async_trait]
pub trait GeofenceOutbound: Send + Sync {
    async fn active_geofences(&self) -> Result<Vec<Geofence>>;
}

#[async_trait]
pub trait DeliveryOutbound: Send + Sync {
    async fn delivery(&self, delivery_id: DeliveryId) -> Result<Option<Delivery>>;
}

#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Remaining travel distance and time between two coordinates.
    async fn estimate(&self, from: Coordinate, to: Coordinate) -> Result<RouteEstimate>;
}
