use std::sync::Arc;

use tracing::{error, instrument};
use tracking_core::{
    Position, Topic, TrackingEvent, TrackingStorage, Trip, trip_stats::recompute_trip_stats,
};

use crate::{EventPublisher, Result};

/// Keeps the statistics of an entity's open trip current as positions arrive.
#[derive(Clone)]
pub struct TripAggregator {
    adapter: Arc<dyn TrackingStorage>,
    publisher: EventPublisher,
}

impl TripAggregator {
    pub fn new(adapter: Arc<dyn TrackingStorage>, publisher: EventPublisher) -> Self {
        Self { adapter, publisher }
    }

    /// Failures are logged and never propagated to the caller.
    #[instrument(skip_all, fields(entity_id = %position.entity_id, position_id = %position.id))]
    pub async fn on_position(&self, position: &Position) {
        if let Err(e) = self.run_single(position).await {
            error!("failed to update trip stats: {e:?}");
        }
    }

    /// Returns the updated trip, or `None` if the position did not belong to an open trip.
    pub async fn run_single(&self, position: &Position) -> Result<Option<Trip>> {
        let Some(trip) = self.adapter.current_trip(position.entity_id).await? else {
            return Ok(None);
        };
        if position.trip_id != Some(trip.id) {
            return Ok(None);
        }

        let positions = self.adapter.positions_of_trip(trip.id).await?;
        let stats = recompute_trip_stats(&positions);

        // The trip may have been finished while we computed.
        let Some(trip) = self.adapter.update_trip_stats(trip.id, stats).await? else {
            return Ok(None);
        };

        self.publisher.publish_all(
            Topic::entity_topics(trip.entity_id),
            &TrackingEvent::TripStatsUpdated {
                entity_id: trip.entity_id,
                trip_id: trip.id,
                stats: trip.stats,
            },
        );

        Ok(Some(trip))
    }
}
