use snafu::ResultExt;
use sqlx::FromRow;
use tracking_core::GeofenceId;

use crate::error::{Error, Result, error::JsonSnafu};

#[derive(Debug, Clone, FromRow)]
pub struct Geofence {
    pub geofence_id: GeofenceId,
    pub name: String,
    pub shape: serde_json::Value,
    pub is_active: bool,
}

impl TryFrom<Geofence> for tracking_core::Geofence {
    type Error = Error;

    fn try_from(v: Geofence) -> Result<Self> {
        Ok(Self {
            id: v.geofence_id,
            name: v.name,
            shape: serde_json::from_value(v.shape).context(JsonSnafu)?,
            is_active: v.is_active,
        })
    }
}
