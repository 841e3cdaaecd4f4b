use std::{sync::Arc, time::Duration};

use chrono::Utc;
use snafu::{OptionExt, ResultExt, ensure};
use tracing::{error, instrument};
use tracking_core::{
    Coordinate, Delivery, DeliveryId, DeliveryPositionId, DeliveryPositionReport,
    RoutingService, Topic, TrackingEvent, TrackingStorage,
};

use crate::{
    EventPublisher, Result,
    error::error::{DeliveryClosedSnafu, DeliveryNotFoundSnafu, ValidationSnafu},
};

mod throttle;

pub use throttle::*;

pub static DEFAULT_ETA_COOLDOWN: Duration = Duration::from_secs(5);

/// Relays courier positions of a delivery to its subscribers and keeps the delivery's
/// route estimate fresh without flooding the routing service.
#[derive(Clone)]
pub struct DeliveryRelay {
    adapter: Arc<dyn TrackingStorage>,
    publisher: EventPublisher,
    eta: Option<EtaDispatcher>,
}

/// Performs routing lookups and distributes their results.
#[derive(Clone)]
struct EtaDispatcher {
    adapter: Arc<dyn TrackingStorage>,
    publisher: EventPublisher,
    routing: Arc<dyn RoutingService>,
    throttle: Arc<EtaThrottle>,
}

impl DeliveryRelay {
    /// Without a routing service no ETA work is done at all.
    pub fn new(
        adapter: Arc<dyn TrackingStorage>,
        publisher: EventPublisher,
        routing: Option<Arc<dyn RoutingService>>,
        eta_cooldown: Duration,
    ) -> Self {
        let eta = routing.map(|routing| EtaDispatcher {
            adapter: adapter.clone(),
            publisher: publisher.clone(),
            routing,
            throttle: Arc::new(EtaThrottle::new(eta_cooldown)),
        });

        Self {
            adapter,
            publisher,
            eta,
        }
    }

    #[instrument(skip_all, fields(delivery_id = %delivery_id))]
    pub async fn relay(
        &self,
        delivery_id: DeliveryId,
        report: DeliveryPositionReport,
    ) -> Result<DeliveryPositionId> {
        report.validate().context(ValidationSnafu)?;

        let delivery = self
            .adapter
            .delivery(delivery_id)
            .await?
            .context(DeliveryNotFoundSnafu { delivery_id })?;

        ensure!(
            delivery.accepts_positions(),
            DeliveryClosedSnafu {
                delivery_id,
                status: delivery.status,
            }
        );

        let position = self
            .adapter
            .add_delivery_position(report.into_new_position(delivery_id, Utc::now()))
            .await?;

        let position_id = position.id;
        let from = position.coordinate;

        self.publisher.publish_all(
            Topic::delivery_topics(delivery_id, delivery.order_id),
            &TrackingEvent::DeliveryPositionUpdate {
                delivery_id,
                order_id: delivery.order_id,
                position,
            },
        );

        if let Some(eta) = &self.eta {
            eta.request(&delivery, from);
        }

        Ok(position_id)
    }
}

impl EtaDispatcher {
    fn request(&self, delivery: &Delivery, from: Coordinate) {
        let request = EtaRequest {
            delivery_id: delivery.id,
            order_id: delivery.order_id,
            from,
            to: delivery.destination,
        };

        let offer = self.throttle.offer(request);
        self.follow(request.delivery_id, offer);
    }

    fn follow(&self, delivery_id: DeliveryId, offer: Offer) {
        match offer {
            Offer::Dispatch(request) => {
                let dispatcher = self.clone();
                tokio::spawn(async move { dispatcher.dispatch(request).await });
            }
            Offer::Schedule { delay } => {
                let dispatcher = self.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    if let Some(request) = dispatcher.throttle.take_pending(delivery_id) {
                        dispatcher.dispatch(request).await;
                    }
                });
            }
            Offer::Coalesced => {}
        }
    }

    /// Runs one lookup, then hands whatever arrived meanwhile back to the throttle.
    #[instrument(skip_all, fields(delivery_id = %request.delivery_id))]
    async fn dispatch(&self, request: EtaRequest) {
        if let Err(e) = self.run_single(request).await {
            error!("failed to refresh delivery eta: {e:?}");
        }

        if let Some(offer) = self.throttle.complete(request.delivery_id) {
            self.follow(request.delivery_id, offer);
        }
    }

    async fn run_single(&self, request: EtaRequest) -> Result<()> {
        let route = self.routing.estimate(request.from, request.to).await?;
        let updated_at = Utc::now();

        self.adapter
            .update_delivery_route(request.delivery_id, route, updated_at)
            .await?;

        self.publisher.publish_all(
            Topic::delivery_topics(request.delivery_id, request.order_id),
            &TrackingEvent::DeliveryEtaUpdated {
                delivery_id: request.delivery_id,
                order_id: request.order_id,
                route,
                updated_at,
            },
        );

        Ok(())
    }
}
