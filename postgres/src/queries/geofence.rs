use crate::{PostgresAdapter, error::Result, models};

impl PostgresAdapter {
    pub(crate) async fn active_geofences_impl(&self) -> Result<Vec<models::Geofence>> {
        Ok(sqlx::query_as::<_, models::Geofence>(
            r#"
SELECT
    geofence_id,
    name,
    shape,
    is_active
FROM
    geofences
WHERE
    is_active
ORDER BY
    geofence_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }
}
