use std::sync::Arc;

use chrono::{TimeZone, Utc};
use processors::Error;
use tracking_core::{
    Coordinate, EntityId, Topic, TrackingEvent, ValidationError, test_helper::Failure,
    trip_stats::recompute_trip_stats,
};

use super::helper::{drain, report, test};

#[tokio::test]
async fn test_ingest_stores_position_and_returns_its_id() {
    test(|helper| async move {
        let entity_id = helper.add_courier();

        let id = helper.ingest(entity_id, 59.91, 10.75).await;

        let positions = helper.storage.all_positions();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].id, id);
        assert_eq!(positions[0].entity_id, entity_id);
        assert_eq!(positions[0].coordinate, Coordinate::new(59.91, 10.75));
        assert_eq!(positions[0].trip_id, None);
    })
    .await;
}

#[tokio::test]
async fn test_invalid_report_is_rejected_before_anything_is_stored() {
    test(|helper| async move {
        let entity_id = helper.add_courier();

        let error = helper
            .ingestor
            .ingest(report(entity_id, 95.0, 10.0))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            Error::Validation {
                source: ValidationError::Latitude { .. },
                ..
            }
        ));
        assert!(helper.storage.all_positions().is_empty());
    })
    .await;
}

#[tokio::test]
async fn test_non_finite_speed_is_rejected() {
    test(|helper| async move {
        let entity_id = helper.add_courier();
        let mut report = report(entity_id, 59.0, 10.0);
        report.speed = Some(f64::INFINITY);

        let error = helper.ingestor.ingest(report).await.unwrap_err();

        assert!(matches!(error, Error::Validation { .. }));
        assert!(helper.storage.all_positions().is_empty());
    })
    .await;
}

#[tokio::test]
async fn test_unknown_entity_is_rejected() {
    test(|helper| async move {
        let error = helper
            .ingestor
            .ingest(report(EntityId::new(404), 59.0, 10.0))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            Error::EntityNotFound { entity_id, .. } if entity_id == EntityId::new(404)
        ));
        assert!(helper.storage.all_positions().is_empty());
    })
    .await;
}

#[tokio::test]
async fn test_failed_position_write_fails_ingestion() {
    test(|helper| async move {
        let entity_id = helper.add_courier();
        helper.storage.fail(Failure::AddPosition);

        let error = helper
            .ingestor
            .ingest(report(entity_id, 59.0, 10.0))
            .await
            .unwrap_err();

        assert!(matches!(error, Error::Storage { .. }));
    })
    .await;
}

#[tokio::test]
async fn test_position_is_tagged_with_the_open_trip() {
    test(|helper| async move {
        let entity_id = helper.add_courier();
        let trip = helper.start_trip(entity_id).await;

        helper.ingest(entity_id, 59.0, 10.0).await;

        assert_eq!(helper.storage.all_positions()[0].trip_id, Some(trip.id));
    })
    .await;
}

#[tokio::test]
async fn test_missing_timestamp_defaults_to_now() {
    test(|helper| async move {
        let entity_id = helper.add_courier();
        let before = Utc::now();

        helper.ingest(entity_id, 59.0, 10.0).await;

        let timestamp = helper.storage.all_positions()[0].timestamp;
        assert!(timestamp >= before && timestamp <= Utc::now());
    })
    .await;
}

#[tokio::test]
async fn test_entity_liveness_is_refreshed() {
    test(|helper| async move {
        let entity_id = helper.add_courier();
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        let mut report = report(entity_id, 59.0, 10.0);
        report.timestamp = Some(timestamp);
        report.battery_level = Some(42.0);

        helper.ingestor.ingest(report).await.unwrap();

        let entity = helper.entity(entity_id);
        assert_eq!(entity.last_seen, Some(timestamp));
        assert_eq!(entity.battery_level, Some(42.0));
    })
    .await;
}

#[tokio::test]
async fn test_liveness_failure_does_not_fail_ingestion() {
    test(|helper| async move {
        let entity_id = helper.add_courier();
        helper.storage.fail(Failure::TouchEntity);

        helper.ingest(entity_id, 59.0, 10.0).await;

        assert_eq!(helper.storage.all_positions().len(), 1);
        assert_eq!(helper.entity(entity_id).last_seen, None);
    })
    .await;
}

#[tokio::test]
async fn test_position_update_is_published_to_entity_and_all_entities() {
    test(|helper| async move {
        let entity_id = helper.add_courier();
        let other = helper.add_courier();
        let mut entity_topic = helper.publisher.subscribe(Topic::Entity(entity_id));
        let mut other_topic = helper.publisher.subscribe(Topic::Entity(other));
        let mut all = helper.publisher.subscribe(Topic::AllEntities);

        let id = helper.ingest(entity_id, 59.0, 10.0).await;

        for events in [drain(&mut entity_topic), drain(&mut all)] {
            assert_eq!(events.len(), 1);
            assert!(matches!(
                &events[0],
                TrackingEvent::PositionUpdate { position } if position.id == id
            ));
        }
        assert!(drain(&mut other_topic).is_empty());
    })
    .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reports_of_one_entity_are_all_processed() {
    test(|helper| async move {
        let entity_id = helper.add_courier();
        let trip = helper.start_trip(entity_id).await;
        let ingestor = Arc::new(helper.ingestor.clone());

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let ingestor = ingestor.clone();
                tokio::spawn(async move {
                    ingestor
                        .ingest(report(entity_id, 59.0 + i as f64 * 0.001, 10.0))
                        .await
                        .unwrap()
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        let mut positions = helper.storage.all_positions();
        assert_eq!(positions.len(), 20);
        assert!(positions.iter().all(|p| p.trip_id == Some(trip.id)));

        positions.sort_by_key(|p| (p.timestamp, p.id));
        let expected = recompute_trip_stats(&positions);
        let stored = helper.storage.trip_snapshot(trip.id).unwrap().stats;
        assert_eq!(stored, expected);
    })
    .await;
}
