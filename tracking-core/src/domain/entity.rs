use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::EntityId;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    pub last_seen: Option<DateTime<Utc>>,
    pub battery_level: Option<f64>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, AsRefStr, EnumString, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Vehicle,
    Courier,
    Asset,
}

/// Liveness metadata refreshed on every accepted position report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityLiveness {
    pub last_seen: DateTime<Utc>,
    pub battery_level: Option<f64>,
}
