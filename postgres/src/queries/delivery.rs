use chrono::{DateTime, Utc};
use tracking_core::{DeliveryId, NewDeliveryPosition, RouteEstimate};

use crate::{PostgresAdapter, error::Result, models};

impl PostgresAdapter {
    pub(crate) async fn add_delivery_position_impl(
        &self,
        position: &NewDeliveryPosition,
    ) -> Result<models::DeliveryPosition> {
        Ok(sqlx::query_as::<_, models::DeliveryPosition>(
            r#"
INSERT INTO
    delivery_positions (
        delivery_id,
        latitude,
        longitude,
        speed,
        heading,
        accuracy,
        timestamp
    )
VALUES
    ($1, $2, $3, $4, $5, $6, $7)
RETURNING
    delivery_position_id,
    delivery_id,
    latitude,
    longitude,
    speed,
    heading,
    accuracy,
    timestamp
            "#,
        )
        .bind(position.delivery_id)
        .bind(position.coordinate.latitude)
        .bind(position.coordinate.longitude)
        .bind(position.speed)
        .bind(position.heading)
        .bind(position.accuracy)
        .bind(position.timestamp)
        .fetch_one(&self.pool)
        .await?)
    }

    pub(crate) async fn update_delivery_route_impl(
        &self,
        delivery_id: DeliveryId,
        route: &RouteEstimate,
        at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
UPDATE deliveries
SET
    route_distance_meters = $2,
    route_duration_seconds = $3,
    eta_updated_at = $4
WHERE
    delivery_id = $1
            "#,
        )
        .bind(delivery_id)
        .bind(route.distance_meters)
        .bind(route.duration_seconds)
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub(crate) async fn delivery_impl(
        &self,
        delivery_id: DeliveryId,
    ) -> Result<Option<models::Delivery>> {
        Ok(sqlx::query_as::<_, models::Delivery>(
            r#"
SELECT
    delivery_id,
    order_id,
    destination_latitude,
    destination_longitude,
    status,
    route_distance_meters,
    route_duration_seconds,
    eta_updated_at
FROM
    deliveries
WHERE
    delivery_id = $1
            "#,
        )
        .bind(delivery_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}
