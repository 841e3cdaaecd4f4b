use tracking_core::{EntityId, EntityLiveness};

use crate::{PostgresAdapter, error::Result, models};

impl PostgresAdapter {
    /// Returns whether the entity exists.
    pub(crate) async fn touch_entity_impl(
        &self,
        entity_id: EntityId,
        liveness: EntityLiveness,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
UPDATE entities
SET
    last_seen = $2,
    battery_level = COALESCE($3, battery_level)
WHERE
    entity_id = $1
            "#,
        )
        .bind(entity_id)
        .bind(liveness.last_seen)
        .bind(liveness.battery_level)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub(crate) async fn entity_impl(&self, entity_id: EntityId) -> Result<Option<models::Entity>> {
        Ok(sqlx::query_as::<_, models::Entity>(
            r#"
SELECT
    entity_id,
    name,
    kind,
    last_seen,
    battery_level
FROM
    entities
WHERE
    entity_id = $1
            "#,
        )
        .bind(entity_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}
