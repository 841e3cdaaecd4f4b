use actix_web::web::{self, Path};
use serde::{Deserialize, Serialize};
use tracking_core::{Position, PositionId, PositionReport};

use super::EntityPath;
use crate::{error::Result, response::Response, states::AppState};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionCreated {
    pub position_id: PositionId,
}

/// Ingests a position report of a tracked entity.
#[tracing::instrument(skip(state))]
pub async fn add_position(
    state: web::Data<AppState>,
    report: web::Json<PositionReport>,
) -> Result<Response<PositionCreated>> {
    let position_id = state.ingestor.ingest(report.into_inner()).await?;
    Ok(Response::new(PositionCreated { position_id }))
}

/// Returns the most recently received position of the entity, if any.
#[tracing::instrument(skip(state))]
pub async fn latest_position(
    state: web::Data<AppState>,
    path: Path<EntityPath>,
) -> Result<Response<Option<Position>>> {
    Ok(Response::new(
        state.storage.latest_position(path.entity_id).await?,
    ))
}
