use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};

use crate::{
    DeliveryId, DeliveryPosition, EntityId, GeofenceId, OrderId, Position, PositionId,
    RouteEstimate, TopicError, TripId, TripStats,
    topic_error::{IdSnafu, UnknownSnafu},
};

static ALL_ENTITIES: &str = "all-entities";

/// Real-time notifications distributed to topic subscribers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum TrackingEvent {
    PositionUpdate {
        position: Position,
    },
    #[serde(rename_all = "camelCase")]
    GeofenceEnter {
        entity_id: EntityId,
        geofence_id: GeofenceId,
        geofence_name: String,
        position_id: PositionId,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    GeofenceExit {
        entity_id: EntityId,
        geofence_id: GeofenceId,
        geofence_name: String,
        position_id: PositionId,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    TripStatsUpdated {
        entity_id: EntityId,
        trip_id: TripId,
        stats: TripStats,
    },
    #[serde(rename_all = "camelCase")]
    DeliveryPositionUpdate {
        delivery_id: DeliveryId,
        order_id: OrderId,
        position: DeliveryPosition,
    },
    #[serde(rename_all = "camelCase")]
    DeliveryEtaUpdated {
        delivery_id: DeliveryId,
        order_id: OrderId,
        route: RouteEstimate,
        updated_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Entity(EntityId),
    AllEntities,
    Order(OrderId),
    Delivery(DeliveryId),
}

impl Topic {
    /// The topics every entity scoped event is published to.
    pub fn entity_topics(entity_id: EntityId) -> [Topic; 2] {
        [Topic::Entity(entity_id), Topic::AllEntities]
    }

    /// The topics every delivery scoped event is published to.
    pub fn delivery_topics(delivery_id: DeliveryId, order_id: OrderId) -> [Topic; 2] {
        [Topic::Delivery(delivery_id), Topic::Order(order_id)]
    }
}

impl Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Topic::Entity(id) => write!(f, "entity:{id}"),
            Topic::AllEntities => f.write_str(ALL_ENTITIES),
            Topic::Order(id) => write!(f, "order:{id}"),
            Topic::Delivery(id) => write!(f, "delivery:{id}"),
        }
    }
}

impl FromStr for Topic {
    type Err = TopicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_ENTITIES {
            return Ok(Topic::AllEntities);
        }

        let (kind, id) = s.split_once(':').context(UnknownSnafu { topic: s })?;
        let id: i64 = id.parse().context(IdSnafu { topic: s })?;

        match kind {
            "entity" => Ok(Topic::Entity(EntityId::new(id))),
            "order" => Ok(Topic::Order(OrderId::new(id))),
            "delivery" => Ok(Topic::Delivery(DeliveryId::new(id))),
            _ => UnknownSnafu { topic: s }.fail(),
        }
    }
}
