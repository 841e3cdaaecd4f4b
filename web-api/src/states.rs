use std::{sync::Arc, time::Duration};

use processors::{DeliveryRelay, EventPublisher, GeofenceEvaluator, PositionIngestor};
use tracking_core::{RoutingService, TrackingStorage};

/// Everything the request handlers share, built once per application.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn TrackingStorage>,
    pub publisher: EventPublisher,
    pub ingestor: PositionIngestor,
    pub geofence: GeofenceEvaluator,
    pub relay: DeliveryRelay,
}

impl AppState {
    pub fn new(
        storage: Arc<dyn TrackingStorage>,
        routing: Option<Arc<dyn RoutingService>>,
        broadcast_buffer_size: usize,
        eta_cooldown: Duration,
    ) -> Self {
        let publisher = EventPublisher::new(broadcast_buffer_size);

        Self {
            ingestor: PositionIngestor::new(storage.clone(), publisher.clone()),
            geofence: GeofenceEvaluator::new(storage.clone(), publisher.clone()),
            relay: DeliveryRelay::new(storage.clone(), publisher.clone(), routing, eta_cooldown),
            storage,
            publisher,
        }
    }
}
