use actix_web::web;
use serde::{Deserialize, Serialize};
use tracking_core::{Coordinate, GeofenceMembership};

use crate::{error::Result, response::Response, states::AppState};

#[derive(Debug, Deserialize, Serialize)]
pub struct MembershipParams {
    pub lat: f64,
    pub lon: f64,
}

/// Reports, for every active geofence, whether the coordinate lies inside it.
#[tracing::instrument(skip(state))]
pub async fn membership(
    state: web::Data<AppState>,
    params: web::Query<MembershipParams>,
) -> Result<Response<Vec<GeofenceMembership>>> {
    Ok(Response::new(
        state
            .geofence
            .membership(Coordinate::new(params.lat, params.lon))
            .await?,
    ))
}
