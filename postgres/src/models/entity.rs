use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracking_core::EntityId;

use super::parse_column;
use crate::error::{Error, Result};

#[derive(Debug, Clone, FromRow)]
pub struct Entity {
    pub entity_id: EntityId,
    pub name: String,
    pub kind: String,
    pub last_seen: Option<DateTime<Utc>>,
    pub battery_level: Option<f64>,
}

impl TryFrom<Entity> for tracking_core::Entity {
    type Error = Error;

    fn try_from(v: Entity) -> Result<Self> {
        Ok(Self {
            id: v.entity_id,
            name: v.name,
            kind: parse_column("entities.kind", v.kind)?,
            last_seen: v.last_seen,
            battery_level: v.battery_level,
        })
    }
}
