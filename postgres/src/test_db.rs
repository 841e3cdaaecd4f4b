use tracking_core::{
    Alert, Coordinate, DeliveryId, DeliveryStatus, EntityId, EntityKind, GeofenceId,
    GeofenceShape, OrderId,
};

use crate::{PostgresAdapter, models};

/// Wrapper with additional methods inteded for testing purposes.
#[derive(Debug, Clone)]
pub struct TestDb {
    pub db: PostgresAdapter,
}

impl TestDb {
    pub async fn create_test_database(&self, db_name: &str) {
        sqlx::query(&format!("CREATE DATABASE \"{db_name}\";"))
            .execute(&self.db.pool)
            .await
            .unwrap();
    }

    pub async fn drop_db(&self, db_name: &str) {
        sqlx::query(&format!("DROP DATABASE \"{db_name}\" WITH (FORCE);"))
            .execute(&self.db.pool)
            .await
            .unwrap();
        self.db.pool.close().await;
    }

    pub async fn add_entity(&self, name: &str, kind: EntityKind) -> EntityId {
        sqlx::query_scalar::<_, EntityId>(
            r#"
INSERT INTO
    entities (name, kind)
VALUES
    ($1, $2)
RETURNING
    entity_id
            "#,
        )
        .bind(name)
        .bind(kind.as_ref())
        .fetch_one(&self.db.pool)
        .await
        .unwrap()
    }

    pub async fn add_geofence(&self, name: &str, shape: &GeofenceShape) -> GeofenceId {
        self.add_raw_geofence(name, serde_json::to_value(shape).unwrap())
            .await
    }

    /// Stores the shape verbatim, which allows storing shapes that cannot be decoded.
    pub async fn add_raw_geofence(&self, name: &str, shape: serde_json::Value) -> GeofenceId {
        sqlx::query_scalar::<_, GeofenceId>(
            r#"
INSERT INTO
    geofences (name, shape)
VALUES
    ($1, $2)
RETURNING
    geofence_id
            "#,
        )
        .bind(name)
        .bind(shape)
        .fetch_one(&self.db.pool)
        .await
        .unwrap()
    }

    pub async fn add_delivery(
        &self,
        order_id: OrderId,
        destination: Coordinate,
        status: DeliveryStatus,
    ) -> DeliveryId {
        sqlx::query_scalar::<_, DeliveryId>(
            r#"
INSERT INTO
    deliveries (
        order_id,
        destination_latitude,
        destination_longitude,
        status
    )
VALUES
    ($1, $2, $3, $4)
RETURNING
    delivery_id
            "#,
        )
        .bind(order_id)
        .bind(destination.latitude)
        .bind(destination.longitude)
        .bind(status.as_ref())
        .fetch_one(&self.db.pool)
        .await
        .unwrap()
    }

    pub async fn all_alerts(&self) -> Vec<Alert> {
        sqlx::query_as::<_, models::Alert>(
            r#"
SELECT
    alert_id,
    entity_id,
    geofence_id,
    position_id,
    severity,
    message,
    created_at
FROM
    alerts
ORDER BY
    alert_id
            "#,
        )
        .fetch_all(&self.db.pool)
        .await
        .unwrap()
        .into_iter()
        .map(|a| Alert::try_from(a).unwrap())
        .collect()
    }
}
