use tracking_core::{EntityId, NewPosition, PositionId, TripId};

use crate::{PostgresAdapter, error::Result, models};

impl PostgresAdapter {
    pub(crate) async fn add_position_impl(
        &self,
        position: &NewPosition,
    ) -> Result<models::Position> {
        Ok(sqlx::query_as::<_, models::Position>(
            r#"
INSERT INTO
    positions (
        entity_id,
        trip_id,
        latitude,
        longitude,
        altitude,
        speed,
        heading,
        accuracy,
        timestamp
    )
VALUES
    ($1, $2, $3, $4, $5, $6, $7, $8, $9)
RETURNING
    position_id,
    entity_id,
    trip_id,
    latitude,
    longitude,
    altitude,
    speed,
    heading,
    accuracy,
    timestamp
            "#,
        )
        .bind(position.entity_id)
        .bind(position.trip_id)
        .bind(position.coordinate.latitude)
        .bind(position.coordinate.longitude)
        .bind(position.altitude)
        .bind(position.speed)
        .bind(position.heading)
        .bind(position.accuracy)
        .bind(position.timestamp)
        .fetch_one(&self.pool)
        .await?)
    }

    pub(crate) async fn positions_of_trip_impl(
        &self,
        trip_id: TripId,
    ) -> Result<Vec<models::Position>> {
        Ok(sqlx::query_as::<_, models::Position>(
            r#"
SELECT
    position_id,
    entity_id,
    trip_id,
    latitude,
    longitude,
    altitude,
    speed,
    heading,
    accuracy,
    timestamp
FROM
    positions
WHERE
    trip_id = $1
ORDER BY
    timestamp ASC,
    position_id ASC
            "#,
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?)
    }

    pub(crate) async fn previous_position_impl(
        &self,
        entity_id: EntityId,
        before: PositionId,
    ) -> Result<Option<models::Position>> {
        Ok(sqlx::query_as::<_, models::Position>(
            r#"
SELECT
    position_id,
    entity_id,
    trip_id,
    latitude,
    longitude,
    altitude,
    speed,
    heading,
    accuracy,
    timestamp
FROM
    positions
WHERE
    entity_id = $1
    AND position_id < $2
ORDER BY
    position_id DESC
LIMIT
    1
            "#,
        )
        .bind(entity_id)
        .bind(before)
        .fetch_optional(&self.pool)
        .await?)
    }

    pub(crate) async fn latest_position_impl(
        &self,
        entity_id: EntityId,
    ) -> Result<Option<models::Position>> {
        Ok(sqlx::query_as::<_, models::Position>(
            r#"
SELECT
    position_id,
    entity_id,
    trip_id,
    latitude,
    longitude,
    altitude,
    speed,
    heading,
    accuracy,
    timestamp
FROM
    positions
WHERE
    entity_id = $1
ORDER BY
    position_id DESC
LIMIT
    1
            "#,
        )
        .bind(entity_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}
