use actix_web::web::{self, Path};
use chrono::Utc;
use snafu::OptionExt;
use tracking_core::{Trip, TripId, TripStatus};

use super::{EntityPath, TripPath};
use crate::{
    error::{Result, error::EntityNotFoundSnafu},
    response::Response,
    states::AppState,
};

#[tracing::instrument(skip(state))]
pub async fn start_trip(
    state: web::Data<AppState>,
    path: Path<EntityPath>,
) -> Result<Response<Trip>> {
    Ok(Response::new(
        state.storage.start_trip(path.entity_id, Utc::now()).await?,
    ))
}

/// Returns the trip in progress of the entity, or `null` if it has none.
#[tracing::instrument(skip(state))]
pub async fn current_trip(
    state: web::Data<AppState>,
    path: Path<EntityPath>,
) -> Result<Response<Option<Trip>>> {
    let entity_id = path.entity_id;
    state
        .storage
        .entity(entity_id)
        .await?
        .context(EntityNotFoundSnafu { entity_id })?;

    Ok(Response::new(state.storage.current_trip(entity_id).await?))
}

#[tracing::instrument(skip(state))]
pub async fn complete_trip(
    state: web::Data<AppState>,
    path: Path<TripPath>,
) -> Result<Response<Trip>> {
    finish(&state, path.trip_id, TripStatus::Completed).await
}

#[tracing::instrument(skip(state))]
pub async fn cancel_trip(
    state: web::Data<AppState>,
    path: Path<TripPath>,
) -> Result<Response<Trip>> {
    finish(&state, path.trip_id, TripStatus::Cancelled).await
}

async fn finish(state: &AppState, trip_id: TripId, status: TripStatus) -> Result<Response<Trip>> {
    Ok(Response::new(
        state.storage.finish_trip(trip_id, status, Utc::now()).await?,
    ))
}
