use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracking_core::{AlertId, EntityId, GeofenceId, PositionId};

use super::parse_column;
use crate::error::{Error, Result};

#[derive(Debug, Clone, FromRow)]
pub struct Alert {
    pub alert_id: AlertId,
    pub entity_id: EntityId,
    pub geofence_id: GeofenceId,
    pub position_id: PositionId,
    pub severity: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<Alert> for tracking_core::Alert {
    type Error = Error;

    fn try_from(v: Alert) -> Result<Self> {
        Ok(Self {
            id: v.alert_id,
            entity_id: v.entity_id,
            geofence_id: v.geofence_id,
            position_id: v.position_id,
            severity: parse_column("alerts.severity", v.severity)?,
            message: v.message,
            created_at: v.created_at,
        })
    }
}
