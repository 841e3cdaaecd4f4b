use std::sync::Arc;

use chrono::Utc;
use snafu::ResultExt;
use tracing::{error, instrument, warn};
use tracking_core::{
    AlertSeverity, Coordinate, Entity, Geofence, GeofenceId, GeofenceMembership, NewAlert,
    Position, Topic, TrackingEvent, TrackingStorage, geometry::is_inside_geofence,
};

use crate::{EventPublisher, Result, error::error::ValidationSnafu};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Enter,
    Exit,
}

/// A change in containment of one entity relative to one geofence.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub geofence_id: GeofenceId,
    pub geofence_name: String,
    pub kind: TransitionKind,
}

/// Detects geofence boundary crossings by comparing a new position with the entity's
/// previous one.
#[derive(Clone)]
pub struct GeofenceEvaluator {
    adapter: Arc<dyn TrackingStorage>,
    publisher: EventPublisher,
}

impl TransitionKind {
    fn detect(is_inside: bool, was_inside: bool) -> Option<Self> {
        match (is_inside, was_inside) {
            (true, false) => Some(TransitionKind::Enter),
            (false, true) => Some(TransitionKind::Exit),
            _ => None,
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            TransitionKind::Enter => "entered",
            TransitionKind::Exit => "exited",
        }
    }
}

impl Transition {
    fn event(&self, position: &Position) -> TrackingEvent {
        let Self {
            geofence_id,
            geofence_name,
            kind,
        } = self.clone();

        match kind {
            TransitionKind::Enter => TrackingEvent::GeofenceEnter {
                entity_id: position.entity_id,
                geofence_id,
                geofence_name,
                position_id: position.id,
                timestamp: position.timestamp,
            },
            TransitionKind::Exit => TrackingEvent::GeofenceExit {
                entity_id: position.entity_id,
                geofence_id,
                geofence_name,
                position_id: position.id,
                timestamp: position.timestamp,
            },
        }
    }
}

impl GeofenceEvaluator {
    pub fn new(adapter: Arc<dyn TrackingStorage>, publisher: EventPublisher) -> Self {
        Self { adapter, publisher }
    }

    /// Evaluates every active geofence against a newly stored position, raising an alert
    /// and publishing an event per transition.
    ///
    /// Storage failures abort the evaluation of this position only and are logged.
    #[instrument(skip_all, fields(entity_id = %entity.id, position_id = %position.id))]
    pub async fn evaluate(&self, entity: &Entity, position: &Position) -> Vec<Transition> {
        match self.run_single(entity, position).await {
            Ok(transitions) => transitions,
            Err(e) => {
                error!("failed to evaluate geofences: {e:?}");
                vec![]
            }
        }
    }

    pub async fn run_single(
        &self,
        entity: &Entity,
        position: &Position,
    ) -> Result<Vec<Transition>> {
        let geofences = self.adapter.active_geofences().await?;
        if geofences.is_empty() {
            return Ok(vec![]);
        }

        // A first position has nothing to cross from.
        let Some(previous) = self
            .adapter
            .previous_position(entity.id, position.id)
            .await?
        else {
            return Ok(vec![]);
        };

        let mut transitions = Vec::new();

        for fence in geofences.iter().filter(|g| g.is_active) {
            if let Err(e) = fence.shape.validate() {
                warn!(geofence_id = %fence.id, "skipping geofence with unusable shape: {e}");
                continue;
            }

            let is_inside = is_inside_geofence(position.coordinate, fence);
            let was_inside = is_inside_geofence(previous.coordinate, fence);

            let Some(kind) = TransitionKind::detect(is_inside, was_inside) else {
                continue;
            };

            let transition = Transition {
                geofence_id: fence.id,
                geofence_name: fence.name.clone(),
                kind,
            };

            self.raise_alert(entity, position, fence, kind).await;
            self.publisher
                .publish_all(Topic::entity_topics(entity.id), &transition.event(position));

            transitions.push(transition);
        }

        Ok(transitions)
    }

    /// Membership of a coordinate in every active geofence, without side effects.
    pub async fn membership(&self, coordinate: Coordinate) -> Result<Vec<GeofenceMembership>> {
        coordinate.validate().context(ValidationSnafu)?;

        let geofences = self.adapter.active_geofences().await?;

        Ok(geofences
            .into_iter()
            .filter(|g| g.is_active)
            .map(|g| GeofenceMembership {
                inside: is_inside_geofence(coordinate, &g),
                geofence_id: g.id,
                name: g.name,
            })
            .collect())
    }

    async fn raise_alert(
        &self,
        entity: &Entity,
        position: &Position,
        fence: &Geofence,
        kind: TransitionKind,
    ) {
        let alert = NewAlert {
            entity_id: entity.id,
            geofence_id: fence.id,
            position_id: position.id,
            severity: AlertSeverity::Warning,
            message: format!("'{}' {} zone '{}'", entity.name, kind.verb(), fence.name),
            created_at: Utc::now(),
        };

        if let Err(e) = self.adapter.add_alert(alert).await {
            error!(geofence_id = %fence.id, "failed to store geofence alert: {e:?}");
        }
    }
}
