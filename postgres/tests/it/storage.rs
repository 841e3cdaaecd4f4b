use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use tracking_core::{
    AlertInbound, AlertSeverity, Coordinate, DeliveryInbound, DeliveryOutbound, DeliveryStatus,
    EntityInbound, EntityKind, EntityLiveness, EntityOutbound, Error, GeofenceOutbound,
    GeofenceShape, NewAlert, NewPosition, OrderId, PositionInbound, PositionOutbound,
    RouteEstimate, TripInbound, TripOutbound, TripStats, TripStatus,
};

use super::helper::test;

fn new_position(
    entity_id: tracking_core::EntityId,
    trip_id: Option<tracking_core::TripId>,
    minute: i64,
) -> NewPosition {
    NewPosition {
        entity_id,
        coordinate: Coordinate::new(59.9, 10.7 + minute as f64 * 0.001),
        altitude: None,
        speed: Some(20.0),
        heading: Some(90.0),
        accuracy: Some(5.0),
        timestamp: Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap() + Duration::minutes(minute),
        trip_id,
    }
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn test_only_one_trip_can_be_in_progress_per_entity() {
    test(|helper| async move {
        let entity_id = helper.db.add_entity("van", EntityKind::Vehicle).await;

        let trip = helper
            .adapter
            .start_trip(entity_id, Utc::now())
            .await
            .unwrap();
        assert_eq!(trip.status, TripStatus::InProgress);

        let error = helper
            .adapter
            .start_trip(entity_id, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(error, Error::TripInProgress { .. }));

        helper
            .adapter
            .finish_trip(trip.id, TripStatus::Completed, Utc::now())
            .await
            .unwrap();
        assert!(helper.adapter.start_trip(entity_id, Utc::now()).await.is_ok());
    })
    .await;
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn test_finishing_a_trip_twice_is_rejected() {
    test(|helper| async move {
        let entity_id = helper.db.add_entity("bike", EntityKind::Courier).await;
        let trip = helper
            .adapter
            .start_trip(entity_id, Utc::now())
            .await
            .unwrap();

        let finished = helper
            .adapter
            .finish_trip(trip.id, TripStatus::Cancelled, Utc::now())
            .await
            .unwrap();
        assert_eq!(finished.status, TripStatus::Cancelled);
        assert!(finished.end_time.is_some());

        let error = helper
            .adapter
            .finish_trip(trip.id, TripStatus::Completed, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(error, Error::TripFinished { .. }));

        let stats = TripStats {
            distance_km: 1.0,
            ..Default::default()
        };
        assert_eq!(
            helper
                .adapter
                .update_trip_stats(trip.id, stats)
                .await
                .unwrap(),
            None
        );
    })
    .await;
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn test_trip_positions_are_ordered_by_timestamp() {
    test(|helper| async move {
        let entity_id = helper.db.add_entity("van", EntityKind::Vehicle).await;
        let trip = helper
            .adapter
            .start_trip(entity_id, Utc::now())
            .await
            .unwrap();

        let late = helper
            .adapter
            .add_position(new_position(entity_id, Some(trip.id), 10))
            .await
            .unwrap();
        let early = helper
            .adapter
            .add_position(new_position(entity_id, Some(trip.id), 0))
            .await
            .unwrap();
        helper
            .adapter
            .add_position(new_position(entity_id, None, 5))
            .await
            .unwrap();

        let positions = helper.adapter.positions_of_trip(trip.id).await.unwrap();
        assert_eq!(positions, vec![early, late]);
    })
    .await;
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn test_previous_position_follows_arrival_order() {
    test(|helper| async move {
        let entity_id = helper.db.add_entity("van", EntityKind::Vehicle).await;
        let other = helper.db.add_entity("truck", EntityKind::Vehicle).await;

        let first = helper
            .adapter
            .add_position(new_position(entity_id, None, 10))
            .await
            .unwrap();
        helper
            .adapter
            .add_position(new_position(other, None, 11))
            .await
            .unwrap();
        let second = helper
            .adapter
            .add_position(new_position(entity_id, None, 0))
            .await
            .unwrap();

        assert_eq!(
            helper
                .adapter
                .previous_position(entity_id, second.id)
                .await
                .unwrap(),
            Some(first.clone())
        );
        assert_eq!(
            helper
                .adapter
                .previous_position(entity_id, first.id)
                .await
                .unwrap(),
            None
        );
        assert_eq!(
            helper.adapter.latest_position(entity_id).await.unwrap(),
            Some(second)
        );
    })
    .await;
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn test_touching_an_entity_keeps_battery_level_when_absent() {
    test(|helper| async move {
        let entity_id = helper.db.add_entity("tag", EntityKind::Asset).await;
        let now = Utc::now();

        helper
            .adapter
            .touch_entity(
                entity_id,
                EntityLiveness {
                    last_seen: now,
                    battery_level: Some(80.0),
                },
            )
            .await
            .unwrap();
        helper
            .adapter
            .touch_entity(
                entity_id,
                EntityLiveness {
                    last_seen: now + Duration::seconds(30),
                    battery_level: None,
                },
            )
            .await
            .unwrap();

        let entity = helper.adapter.entity(entity_id).await.unwrap().unwrap();
        assert_eq!(entity.battery_level, Some(80.0));
        assert!(entity.last_seen.unwrap() > now);

        let error = helper
            .adapter
            .touch_entity(
                tracking_core::EntityId::new(entity_id.into_inner() + 1_000),
                EntityLiveness {
                    last_seen: now,
                    battery_level: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(error, Error::EntityMissing { .. }));
    })
    .await;
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn test_undecodable_geofences_are_skipped() {
    test(|helper| async move {
        let depot = helper
            .db
            .add_geofence(
                "depot",
                &GeofenceShape::Circle {
                    center: Coordinate::new(59.9, 10.7),
                    radius_meters: 250.0,
                },
            )
            .await;
        helper
            .db
            .add_raw_geofence("broken", json!({ "type": "hexagon" }))
            .await;

        let geofences = helper.adapter.active_geofences().await.unwrap();
        assert_eq!(geofences.len(), 1);
        assert_eq!(geofences[0].id, depot);
    })
    .await;
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn test_alert_is_stored_with_severity() {
    test(|helper| async move {
        let entity_id = helper.db.add_entity("van", EntityKind::Vehicle).await;
        let geofence_id = helper
            .db
            .add_geofence(
                "depot",
                &GeofenceShape::Circle {
                    center: Coordinate::new(59.9, 10.7),
                    radius_meters: 250.0,
                },
            )
            .await;
        let position = helper
            .adapter
            .add_position(new_position(entity_id, None, 0))
            .await
            .unwrap();

        let alert = helper
            .adapter
            .add_alert(NewAlert {
                entity_id,
                geofence_id,
                position_id: position.id,
                severity: AlertSeverity::Warning,
                message: "'van' entered zone 'depot'".into(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        assert_eq!(helper.db.all_alerts().await, vec![alert]);
    })
    .await;
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn test_delivery_route_is_updated() {
    test(|helper| async move {
        let delivery_id = helper
            .db
            .add_delivery(
                OrderId::new(42),
                Coordinate::new(59.95, 10.8),
                DeliveryStatus::InTransit,
            )
            .await;
        let route = RouteEstimate {
            distance_meters: 1_200.0,
            duration_seconds: 300.0,
        };

        helper
            .adapter
            .update_delivery_route(delivery_id, route, Utc::now())
            .await
            .unwrap();

        let delivery = helper.adapter.delivery(delivery_id).await.unwrap().unwrap();
        assert_eq!(delivery.order_id, OrderId::new(42));
        assert_eq!(delivery.route, Some(route));
        assert!(delivery.eta_updated_at.is_some());
        assert!(delivery.accepts_positions());
    })
    .await;
}
