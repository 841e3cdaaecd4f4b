//! An in-memory implementation of every storage port, used by the tests of the
//! processing pipeline and the web api.
use std::{
    collections::{BTreeMap, HashSet},
    sync::Mutex,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use snafu::{ResultExt, Snafu};

use crate::{
    core_error::{
        EntityMissingSnafu, StorageSnafu, TripFinishedSnafu, TripInProgressSnafu,
        TripNotFoundSnafu,
    },
    *,
};

/// Storage operations that can be made to fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Failure {
    AddPosition,
    TouchEntity,
    TripStats,
    ActiveGeofences,
    PreviousPosition,
    AddAlert,
    DeliveryRoute,
    Routing,
}

#[derive(Debug, Snafu)]
#[snafu(display("Injected failure of '{failure:?}'"))]
pub struct InjectedError {
    failure: Failure,
}

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    entities: BTreeMap<EntityId, Entity>,
    positions: Vec<Position>,
    trips: BTreeMap<TripId, Trip>,
    geofences: BTreeMap<GeofenceId, Geofence>,
    alerts: Vec<Alert>,
    deliveries: BTreeMap<DeliveryId, Delivery>,
    delivery_positions: Vec<DeliveryPosition>,
    failures: HashSet<Failure>,
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: Mutex<State>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check(&self, failure: Failure) -> Result<()> {
        if self.failures.contains(&failure) {
            InjectedSnafu { failure }
                .fail()
                .boxed()
                .context(StorageSnafu)
        } else {
            Ok(())
        }
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, failure: Failure) {
        self.state.lock().unwrap().failures.insert(failure);
    }

    pub fn recover(&self, failure: Failure) {
        self.state.lock().unwrap().failures.remove(&failure);
    }

    pub fn add_entity(&self, name: &str, kind: EntityKind) -> EntityId {
        let mut state = self.state.lock().unwrap();
        let id = EntityId::new(state.next_id());
        state.entities.insert(
            id,
            Entity {
                id,
                name: name.into(),
                kind,
                last_seen: None,
                battery_level: None,
            },
        );
        id
    }

    pub fn add_geofence(&self, name: &str, shape: GeofenceShape) -> GeofenceId {
        let mut state = self.state.lock().unwrap();
        let id = GeofenceId::new(state.next_id());
        state.geofences.insert(
            id,
            Geofence {
                id,
                name: name.into(),
                shape,
                is_active: true,
            },
        );
        id
    }

    pub fn set_geofence_active(&self, geofence_id: GeofenceId, is_active: bool) {
        if let Some(fence) = self.state.lock().unwrap().geofences.get_mut(&geofence_id) {
            fence.is_active = is_active;
        }
    }

    pub fn add_delivery(&self, order_id: OrderId, destination: Coordinate) -> DeliveryId {
        let mut state = self.state.lock().unwrap();
        let id = DeliveryId::new(state.next_id());
        state.deliveries.insert(
            id,
            Delivery {
                id,
                order_id,
                destination,
                status: DeliveryStatus::InTransit,
                route: None,
                eta_updated_at: None,
            },
        );
        id
    }

    pub fn set_delivery_status(&self, delivery_id: DeliveryId, status: DeliveryStatus) {
        if let Some(delivery) = self.state.lock().unwrap().deliveries.get_mut(&delivery_id) {
            delivery.status = status;
        }
    }

    pub fn all_positions(&self) -> Vec<Position> {
        self.state.lock().unwrap().positions.clone()
    }

    pub fn all_alerts(&self) -> Vec<Alert> {
        self.state.lock().unwrap().alerts.clone()
    }

    pub fn all_delivery_positions(&self) -> Vec<DeliveryPosition> {
        self.state.lock().unwrap().delivery_positions.clone()
    }

    pub fn entity_snapshot(&self, entity_id: EntityId) -> Option<Entity> {
        self.state.lock().unwrap().entities.get(&entity_id).cloned()
    }

    pub fn trip_snapshot(&self, trip_id: TripId) -> Option<Trip> {
        self.state.lock().unwrap().trips.get(&trip_id).cloned()
    }

    pub fn delivery_snapshot(&self, delivery_id: DeliveryId) -> Option<Delivery> {
        self.state.lock().unwrap().deliveries.get(&delivery_id).cloned()
    }
}

#[async_trait]
impl PositionInbound for MemoryStorage {
    async fn add_position(&self, position: NewPosition) -> Result<Position> {
        let mut state = self.state.lock().unwrap();
        state.check(Failure::AddPosition)?;

        let position = Position {
            id: PositionId::new(state.next_id()),
            entity_id: position.entity_id,
            coordinate: position.coordinate,
            altitude: position.altitude,
            speed: position.speed,
            heading: position.heading,
            accuracy: position.accuracy,
            timestamp: position.timestamp,
            trip_id: position.trip_id,
        };
        state.positions.push(position.clone());
        Ok(position)
    }
}

#[async_trait]
impl PositionOutbound for MemoryStorage {
    async fn positions_of_trip(&self, trip_id: TripId) -> Result<Vec<Position>> {
        let state = self.state.lock().unwrap();
        let mut positions: Vec<Position> = state
            .positions
            .iter()
            .filter(|p| p.trip_id == Some(trip_id))
            .cloned()
            .collect();
        positions.sort_by_key(|p| (p.timestamp, p.id));
        Ok(positions)
    }

    async fn previous_position(
        &self,
        entity_id: EntityId,
        before: PositionId,
    ) -> Result<Option<Position>> {
        let state = self.state.lock().unwrap();
        state.check(Failure::PreviousPosition)?;
        Ok(state
            .positions
            .iter()
            .filter(|p| p.entity_id == entity_id && p.id < before)
            .max_by_key(|p| p.id)
            .cloned())
    }

    async fn latest_position(&self, entity_id: EntityId) -> Result<Option<Position>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .positions
            .iter()
            .filter(|p| p.entity_id == entity_id)
            .max_by_key(|p| p.id)
            .cloned())
    }
}

#[async_trait]
impl EntityInbound for MemoryStorage {
    async fn touch_entity(&self, entity_id: EntityId, liveness: EntityLiveness) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.check(Failure::TouchEntity)?;

        let entity = state
            .entities
            .get_mut(&entity_id)
            .ok_or_else(|| EntityMissingSnafu { entity_id }.build())?;
        entity.last_seen = Some(liveness.last_seen);
        if liveness.battery_level.is_some() {
            entity.battery_level = liveness.battery_level;
        }
        Ok(())
    }
}

#[async_trait]
impl EntityOutbound for MemoryStorage {
    async fn entity(&self, entity_id: EntityId) -> Result<Option<Entity>> {
        Ok(self.entity_snapshot(entity_id))
    }
}

#[async_trait]
impl TripInbound for MemoryStorage {
    async fn start_trip(&self, entity_id: EntityId, at: DateTime<Utc>) -> Result<Trip> {
        let mut state = self.state.lock().unwrap();
        if !state.entities.contains_key(&entity_id) {
            return EntityMissingSnafu { entity_id }.fail();
        }
        if state
            .trips
            .values()
            .any(|t| t.entity_id == entity_id && t.is_in_progress())
        {
            return TripInProgressSnafu { entity_id }.fail();
        }

        let trip = Trip {
            id: TripId::new(state.next_id()),
            entity_id,
            status: TripStatus::InProgress,
            start_time: at,
            end_time: None,
            stats: TripStats::default(),
        };
        state.trips.insert(trip.id, trip.clone());
        Ok(trip)
    }

    async fn finish_trip(
        &self,
        trip_id: TripId,
        status: TripStatus,
        at: DateTime<Utc>,
    ) -> Result<Trip> {
        let mut state = self.state.lock().unwrap();
        let trip = state
            .trips
            .get_mut(&trip_id)
            .ok_or_else(|| TripNotFoundSnafu { trip_id }.build())?;
        if !trip.is_in_progress() {
            return TripFinishedSnafu { trip_id }.fail();
        }

        trip.status = status;
        trip.end_time = Some(at);
        Ok(trip.clone())
    }

    async fn update_trip_stats(&self, trip_id: TripId, stats: TripStats) -> Result<Option<Trip>> {
        let mut state = self.state.lock().unwrap();
        state.check(Failure::TripStats)?;

        Ok(state
            .trips
            .get_mut(&trip_id)
            .filter(|t| t.is_in_progress())
            .map(|t| {
                t.stats = stats;
                t.clone()
            }))
    }
}

#[async_trait]
impl TripOutbound for MemoryStorage {
    async fn current_trip(&self, entity_id: EntityId) -> Result<Option<Trip>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .trips
            .values()
            .find(|t| t.entity_id == entity_id && t.is_in_progress())
            .cloned())
    }

    async fn trip(&self, trip_id: TripId) -> Result<Option<Trip>> {
        Ok(self.trip_snapshot(trip_id))
    }
}

#[async_trait]
impl GeofenceOutbound for MemoryStorage {
    async fn active_geofences(&self) -> Result<Vec<Geofence>> {
        let state = self.state.lock().unwrap();
        state.check(Failure::ActiveGeofences)?;
        Ok(state
            .geofences
            .values()
            .filter(|g| g.is_active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AlertInbound for MemoryStorage {
    async fn add_alert(&self, alert: NewAlert) -> Result<Alert> {
        let mut state = self.state.lock().unwrap();
        state.check(Failure::AddAlert)?;

        let alert = Alert {
            id: AlertId::new(state.next_id()),
            entity_id: alert.entity_id,
            geofence_id: alert.geofence_id,
            position_id: alert.position_id,
            severity: alert.severity,
            message: alert.message,
            created_at: alert.created_at,
        };
        state.alerts.push(alert.clone());
        Ok(alert)
    }
}

#[async_trait]
impl DeliveryInbound for MemoryStorage {
    async fn add_delivery_position(
        &self,
        position: NewDeliveryPosition,
    ) -> Result<DeliveryPosition> {
        let mut state = self.state.lock().unwrap();
        let position = DeliveryPosition {
            id: DeliveryPositionId::new(state.next_id()),
            delivery_id: position.delivery_id,
            coordinate: position.coordinate,
            speed: position.speed,
            heading: position.heading,
            accuracy: position.accuracy,
            timestamp: position.timestamp,
        };
        state.delivery_positions.push(position.clone());
        Ok(position)
    }

    async fn update_delivery_route(
        &self,
        delivery_id: DeliveryId,
        route: RouteEstimate,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.check(Failure::DeliveryRoute)?;

        if let Some(delivery) = state.deliveries.get_mut(&delivery_id) {
            delivery.route = Some(route);
            delivery.eta_updated_at = Some(at);
        }
        Ok(())
    }
}

#[async_trait]
impl DeliveryOutbound for MemoryStorage {
    async fn delivery(&self, delivery_id: DeliveryId) -> Result<Option<Delivery>> {
        Ok(self.delivery_snapshot(delivery_id))
    }
}

/// A routing service double that records every lookup.
#[derive(Debug)]
pub struct RouteRecorder {
    estimate: RouteEstimate,
    calls: Mutex<Vec<(Coordinate, Coordinate)>>,
    failing: Mutex<bool>,
}

impl RouteRecorder {
    pub fn new(estimate: RouteEstimate) -> Self {
        Self {
            estimate,
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn calls(&self) -> Vec<(Coordinate, Coordinate)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for RouteRecorder {
    fn default() -> Self {
        Self::new(RouteEstimate {
            distance_meters: 1_500.0,
            duration_seconds: 240.0,
        })
    }
}

#[async_trait]
impl RoutingService for RouteRecorder {
    async fn estimate(&self, from: Coordinate, to: Coordinate) -> Result<RouteEstimate> {
        self.calls.lock().unwrap().push((from, to));
        if *self.failing.lock().unwrap() {
            return InjectedSnafu {
                failure: Failure::Routing,
            }
            .fail()
            .boxed()
            .context(core_error::RoutingSnafu);
        }
        Ok(self.estimate)
    }
}
