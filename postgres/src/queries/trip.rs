use chrono::{DateTime, Utc};
use tracking_core::{EntityId, TripId, TripStats, TripStatus};

use crate::{PostgresAdapter, error::Result, models};

impl PostgresAdapter {
    /// Returns `None` if the entity already has a trip in progress.
    pub(crate) async fn start_trip_impl(
        &self,
        entity_id: EntityId,
        at: DateTime<Utc>,
    ) -> Result<Option<models::Trip>> {
        Ok(sqlx::query_as::<_, models::Trip>(
            r#"
INSERT INTO
    trips (entity_id, status, start_time)
VALUES
    ($1, $2, $3)
ON CONFLICT (entity_id)
WHERE
    status = 'in_progress' DO NOTHING
RETURNING
    trip_id,
    entity_id,
    status,
    start_time,
    end_time,
    distance_km,
    duration_minutes,
    avg_speed,
    max_speed
            "#,
        )
        .bind(entity_id)
        .bind(TripStatus::InProgress.to_string())
        .bind(at)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Returns `None` if no in-progress trip with the id exists.
    pub(crate) async fn finish_trip_impl(
        &self,
        trip_id: TripId,
        status: TripStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<models::Trip>> {
        Ok(sqlx::query_as::<_, models::Trip>(
            r#"
UPDATE trips
SET
    status = $2,
    end_time = $3
WHERE
    trip_id = $1
    AND status = 'in_progress'
RETURNING
    trip_id,
    entity_id,
    status,
    start_time,
    end_time,
    distance_km,
    duration_minutes,
    avg_speed,
    max_speed
            "#,
        )
        .bind(trip_id)
        .bind(status.as_ref())
        .bind(at)
        .fetch_optional(&self.pool)
        .await?)
    }

    pub(crate) async fn update_trip_stats_impl(
        &self,
        trip_id: TripId,
        stats: &TripStats,
    ) -> Result<Option<models::Trip>> {
        Ok(sqlx::query_as::<_, models::Trip>(
            r#"
UPDATE trips
SET
    distance_km = $2,
    duration_minutes = $3,
    avg_speed = $4,
    max_speed = $5
WHERE
    trip_id = $1
    AND status = 'in_progress'
RETURNING
    trip_id,
    entity_id,
    status,
    start_time,
    end_time,
    distance_km,
    duration_minutes,
    avg_speed,
    max_speed
            "#,
        )
        .bind(trip_id)
        .bind(stats.distance_km)
        .bind(stats.duration_minutes)
        .bind(stats.avg_speed)
        .bind(stats.max_speed)
        .fetch_optional(&self.pool)
        .await?)
    }

    pub(crate) async fn current_trip_impl(
        &self,
        entity_id: EntityId,
    ) -> Result<Option<models::Trip>> {
        Ok(sqlx::query_as::<_, models::Trip>(
            r#"
SELECT
    trip_id,
    entity_id,
    status,
    start_time,
    end_time,
    distance_km,
    duration_minutes,
    avg_speed,
    max_speed
FROM
    trips
WHERE
    entity_id = $1
    AND status = 'in_progress'
            "#,
        )
        .bind(entity_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    pub(crate) async fn trip_impl(&self, trip_id: TripId) -> Result<Option<models::Trip>> {
        Ok(sqlx::query_as::<_, models::Trip>(
            r#"
SELECT
    trip_id,
    entity_id,
    status,
    start_time,
    end_time,
    distance_km,
    duration_minutes,
    avg_speed,
    max_speed
FROM
    trips
WHERE
    trip_id = $1
            "#,
        )
        .bind(trip_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}
