use actix_web::web::{self, Path};
use serde::{Deserialize, Serialize};
use tracking_core::{DeliveryPositionId, DeliveryPositionReport};

use super::DeliveryPath;
use crate::{error::Result, response::Response, states::AppState};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPositionCreated {
    pub position_id: DeliveryPositionId,
}

/// Relays a courier position to everyone following the delivery or its order.
#[tracing::instrument(skip(state))]
pub async fn add_delivery_position(
    state: web::Data<AppState>,
    path: Path<DeliveryPath>,
    report: web::Json<DeliveryPositionReport>,
) -> Result<Response<DeliveryPositionCreated>> {
    let position_id = state
        .relay
        .relay(path.delivery_id, report.into_inner())
        .await?;
    Ok(Response::new(DeliveryPositionCreated { position_id }))
}
