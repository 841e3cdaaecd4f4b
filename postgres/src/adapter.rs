use async_trait::async_trait;
use chrono::{DateTime, Utc};
use snafu::ResultExt;
use sqlx::{
    ConnectOptions, PgPool,
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
};
use tracing::{instrument, warn};
use tracking_core::{
    Alert, AlertInbound, Delivery, DeliveryId, DeliveryInbound, DeliveryOutbound,
    DeliveryPosition, Entity, EntityId, EntityInbound, EntityLiveness, EntityOutbound, Geofence,
    GeofenceOutbound, NewAlert, NewDeliveryPosition, NewPosition, Position, PositionId,
    PositionInbound, PositionOutbound, RouteEstimate, Trip, TripId, TripInbound, TripOutbound,
    TripStats, TripStatus,
    core_error::{EntityMissingSnafu, TripFinishedSnafu, TripInProgressSnafu, TripNotFoundSnafu},
};

use crate::{
    PsqlLogStatements, PsqlSettings,
    error::{
        Result,
        error::{ConnectionSnafu, MigrationSnafu},
    },
};

type CoreResult<T> = tracking_core::Result<T>;

#[derive(Debug, Clone)]
pub struct PostgresAdapter {
    pub(crate) pool: PgPool,
}

impl PostgresAdapter {
    pub async fn new(settings: &PsqlSettings) -> Result<PostgresAdapter> {
        let mut opts = PgConnectOptions::new()
            .username(&settings.username)
            .host(&settings.ip)
            .port(settings.port)
            .options([("plan_cache_mode", "force_custom_plan")]);

        if let Some(password) = &settings.password {
            opts = opts.password(password);
        }

        if let Some(db_name) = &settings.db_name {
            opts = opts.database(db_name);
        }

        if let Some(root_cert_path) = &settings.root_cert {
            opts = opts
                .ssl_root_cert(root_cert_path)
                .ssl_mode(PgSslMode::VerifyFull);
        }

        match settings.log_statements {
            PsqlLogStatements::Enable => (),
            PsqlLogStatements::Disable => {
                opts = opts.disable_statement_logging();
            }
        }

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections.max(1))
            .connect_with(opts)
            .await
            .context(ConnectionSnafu)?;

        Ok(PostgresAdapter { pool })
    }

    pub async fn do_migrations(&self) -> Result<()> {
        sqlx::migrate!()
            .set_ignore_missing(true)
            .run(&self.pool)
            .await
            .context(MigrationSnafu)
    }
}

#[async_trait]
impl PositionInbound for PostgresAdapter {
    async fn add_position(&self, position: NewPosition) -> CoreResult<Position> {
        Ok(self.add_position_impl(&position).await?.into())
    }
}

#[async_trait]
impl PositionOutbound for PostgresAdapter {
    async fn positions_of_trip(&self, trip_id: TripId) -> CoreResult<Vec<Position>> {
        Ok(self
            .positions_of_trip_impl(trip_id)
            .await?
            .into_iter()
            .map(Position::from)
            .collect())
    }

    async fn previous_position(
        &self,
        entity_id: EntityId,
        before: PositionId,
    ) -> CoreResult<Option<Position>> {
        Ok(self
            .previous_position_impl(entity_id, before)
            .await?
            .map(Position::from))
    }

    async fn latest_position(&self, entity_id: EntityId) -> CoreResult<Option<Position>> {
        Ok(self.latest_position_impl(entity_id).await?.map(Position::from))
    }
}

#[async_trait]
impl EntityInbound for PostgresAdapter {
    async fn touch_entity(&self, entity_id: EntityId, liveness: EntityLiveness) -> CoreResult<()> {
        if self.touch_entity_impl(entity_id, liveness).await? {
            Ok(())
        } else {
            EntityMissingSnafu { entity_id }.fail()
        }
    }
}

#[async_trait]
impl EntityOutbound for PostgresAdapter {
    async fn entity(&self, entity_id: EntityId) -> CoreResult<Option<Entity>> {
        Ok(self
            .entity_impl(entity_id)
            .await?
            .map(Entity::try_from)
            .transpose()?)
    }
}

#[async_trait]
impl TripInbound for PostgresAdapter {
    async fn start_trip(&self, entity_id: EntityId, at: DateTime<Utc>) -> CoreResult<Trip> {
        if self.entity_impl(entity_id).await?.is_none() {
            return EntityMissingSnafu { entity_id }.fail();
        }

        match self.start_trip_impl(entity_id, at).await? {
            Some(trip) => Ok(Trip::try_from(trip)?),
            None => TripInProgressSnafu { entity_id }.fail(),
        }
    }

    async fn finish_trip(
        &self,
        trip_id: TripId,
        status: TripStatus,
        at: DateTime<Utc>,
    ) -> CoreResult<Trip> {
        if let Some(trip) = self.finish_trip_impl(trip_id, status, at).await? {
            return Ok(Trip::try_from(trip)?);
        }

        match self.trip_impl(trip_id).await? {
            Some(_) => TripFinishedSnafu { trip_id }.fail(),
            None => TripNotFoundSnafu { trip_id }.fail(),
        }
    }

    async fn update_trip_stats(
        &self,
        trip_id: TripId,
        stats: TripStats,
    ) -> CoreResult<Option<Trip>> {
        Ok(self
            .update_trip_stats_impl(trip_id, &stats)
            .await?
            .map(Trip::try_from)
            .transpose()?)
    }
}

#[async_trait]
impl TripOutbound for PostgresAdapter {
    async fn current_trip(&self, entity_id: EntityId) -> CoreResult<Option<Trip>> {
        Ok(self
            .current_trip_impl(entity_id)
            .await?
            .map(Trip::try_from)
            .transpose()?)
    }

    async fn trip(&self, trip_id: TripId) -> CoreResult<Option<Trip>> {
        Ok(self
            .trip_impl(trip_id)
            .await?
            .map(Trip::try_from)
            .transpose()?)
    }
}

#[async_trait]
impl GeofenceOutbound for PostgresAdapter {
    #[instrument(skip_all)]
    async fn active_geofences(&self) -> CoreResult<Vec<Geofence>> {
        let rows = self.active_geofences_impl().await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let geofence_id = row.geofence_id;
                match Geofence::try_from(row) {
                    Ok(geofence) => Some(geofence),
                    Err(e) => {
                        warn!("skipping geofence '{geofence_id}' with undecodable shape: {e:?}");
                        None
                    }
                }
            })
            .collect())
    }
}

#[async_trait]
impl AlertInbound for PostgresAdapter {
    async fn add_alert(&self, alert: NewAlert) -> CoreResult<Alert> {
        Ok(Alert::try_from(self.add_alert_impl(&alert).await?)?)
    }
}

#[async_trait]
impl DeliveryInbound for PostgresAdapter {
    async fn add_delivery_position(
        &self,
        position: NewDeliveryPosition,
    ) -> CoreResult<DeliveryPosition> {
        Ok(self.add_delivery_position_impl(&position).await?.into())
    }

    async fn update_delivery_route(
        &self,
        delivery_id: DeliveryId,
        route: RouteEstimate,
        at: DateTime<Utc>,
    ) -> CoreResult<()> {
        Ok(self.update_delivery_route_impl(delivery_id, &route, at).await?)
    }
}

#[async_trait]
impl DeliveryOutbound for PostgresAdapter {
    async fn delivery(&self, delivery_id: DeliveryId) -> CoreResult<Option<Delivery>> {
        Ok(self
            .delivery_impl(delivery_id)
            .await?
            .map(Delivery::try_from)
            .transpose()?)
    }
}
