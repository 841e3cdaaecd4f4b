use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use chrono::{DateTime, Utc};
use snafu::{OptionExt, ResultExt};
use tracing::{error, instrument};
use tracking_core::{
    Entity, EntityId, EntityLiveness, PositionId, PositionReport, Topic, TrackingEvent,
    TrackingStorage,
};

use crate::{
    EventPublisher, GeofenceEvaluator, Result, TripAggregator,
    error::error::{EntityNotFoundSnafu, ValidationSnafu},
};

/// Async locks keyed by entity, so the reports of one entity are processed one at a time
/// in arrival order while different entities never contend.
#[derive(Debug, Default)]
struct EntityLocks {
    locks: Mutex<HashMap<EntityId, Arc<tokio::sync::Mutex<()>>>>,
}

impl EntityLocks {
    fn acquire(&self, entity_id: EntityId) -> Arc<tokio::sync::Mutex<()>> {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(entity_id)
            .or_default()
            .clone()
    }

    /// Forgets the entity's lock if no other report is holding or waiting for it.
    fn release(&self, entity_id: EntityId, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map and the one we were handed.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&entity_id);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Entry point of the position pipeline.
#[derive(Clone)]
pub struct PositionIngestor {
    adapter: Arc<dyn TrackingStorage>,
    publisher: EventPublisher,
    trip_aggregator: TripAggregator,
    geofence: GeofenceEvaluator,
    locks: Arc<EntityLocks>,
}

impl PositionIngestor {
    pub fn new(adapter: Arc<dyn TrackingStorage>, publisher: EventPublisher) -> Self {
        Self {
            trip_aggregator: TripAggregator::new(adapter.clone(), publisher.clone()),
            geofence: GeofenceEvaluator::new(adapter.clone(), publisher.clone()),
            adapter,
            publisher,
            locks: Default::default(),
        }
    }

    /// Validates, stores and fans out a position report.
    ///
    /// Only validation, entity resolution and the position write can fail the call, every
    /// later step is best effort and logs its failures.
    #[instrument(skip_all, fields(entity_id = %report.entity_id))]
    pub async fn ingest(&self, report: PositionReport) -> Result<PositionId> {
        report.validate().context(ValidationSnafu)?;

        let entity_id = report.entity_id;
        let entity = self
            .adapter
            .entity(entity_id)
            .await?
            .context(EntityNotFoundSnafu { entity_id })?;

        let received_at = Utc::now();

        let lock = self.locks.acquire(entity_id);
        let guard = lock.lock().await;
        let result = self.process(entity, report, received_at).await;
        drop(guard);
        self.locks.release(entity_id, lock);

        result
    }

    async fn process(
        &self,
        entity: Entity,
        report: PositionReport,
        received_at: DateTime<Utc>,
    ) -> Result<PositionId> {
        let trip_id = self.adapter.current_trip(entity.id).await?.map(|t| t.id);
        let battery_level = report.battery_level;

        let position = self
            .adapter
            .add_position(report.into_new_position(trip_id, received_at))
            .await?;

        let liveness = EntityLiveness {
            last_seen: position.timestamp,
            battery_level,
        };
        if let Err(e) = self.adapter.touch_entity(entity.id, liveness).await {
            error!("failed to update entity liveness: {e:?}");
        }

        self.trip_aggregator.on_position(&position).await;
        self.geofence.evaluate(&entity, &position).await;

        let position_id = position.id;
        self.publisher.publish_all(
            Topic::entity_topics(entity.id),
            &TrackingEvent::PositionUpdate { position },
        );

        Ok(position_id)
    }
}
