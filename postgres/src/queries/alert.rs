use tracking_core::NewAlert;

use crate::{PostgresAdapter, error::Result, models};

impl PostgresAdapter {
    pub(crate) async fn add_alert_impl(&self, alert: &NewAlert) -> Result<models::Alert> {
        Ok(sqlx::query_as::<_, models::Alert>(
            r#"
INSERT INTO
    alerts (
        entity_id,
        geofence_id,
        position_id,
        severity,
        message,
        created_at
    )
VALUES
    ($1, $2, $3, $4, $5, $6)
RETURNING
    alert_id,
    entity_id,
    geofence_id,
    position_id,
    severity,
    message,
    created_at
            "#,
        )
        .bind(alert.entity_id)
        .bind(alert.geofence_id)
        .bind(alert.position_id)
        .bind(alert.severity.as_ref())
        .bind(&alert.message)
        .bind(alert.created_at)
        .fetch_one(&self.pool)
        .await?)
    }
}
