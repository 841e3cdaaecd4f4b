use chrono::{Duration, TimeZone, Utc};
use tracking_core::{
    Coordinate, GeofenceShape, Topic, TrackingEvent, TripInbound, TripOutbound, TripStatus,
};

use super::helper::{drain, test};

fn kind(event: &TrackingEvent) -> &'static str {
    match event {
        TrackingEvent::PositionUpdate { .. } => "position",
        TrackingEvent::GeofenceEnter { .. } => "enter",
        TrackingEvent::GeofenceExit { .. } => "exit",
        TrackingEvent::TripStatsUpdated { .. } => "stats",
        TrackingEvent::DeliveryPositionUpdate { .. } => "delivery",
        TrackingEvent::DeliveryEtaUpdated { .. } => "eta",
    }
}

#[tokio::test]
async fn test_courier_passing_through_a_zone_during_a_trip() {
    test(|helper| async move {
        let entity_id = helper.add_courier();
        let trip = helper.start_trip(entity_id).await;
        helper.storage.add_geofence(
            "warehouse",
            GeofenceShape::Circle {
                center: Coordinate::new(59.91, 10.75),
                radius_meters: 200.0,
            },
        );
        let mut all = helper.publisher.subscribe(Topic::AllEntities);
        let start = Utc.with_ymd_and_hms(2024, 9, 2, 7, 0, 0).unwrap();

        let route = [(59.90, 10.75), (59.91, 10.75), (59.92, 10.75)];
        for (i, (latitude, longitude)) in route.into_iter().enumerate() {
            helper
                .ingest_at(
                    entity_id,
                    Coordinate::new(latitude, longitude),
                    start + Duration::minutes(5 * i as i64),
                    Some(24.0),
                )
                .await;
        }

        let kinds: Vec<_> = drain(&mut all).iter().map(kind).collect();
        assert_eq!(
            kinds,
            vec![
                "stats", "position", "stats", "enter", "position", "stats", "exit", "position"
            ]
        );

        let trip = helper
            .storage
            .finish_trip(trip.id, TripStatus::Completed, start + Duration::minutes(15))
            .await
            .unwrap();
        assert_eq!(trip.status, TripStatus::Completed);
        assert!((trip.stats.distance_km - 2.224).abs() < 0.01, "{:?}", trip.stats);
        assert_eq!(trip.stats.duration_minutes, 10.0);
        assert_eq!(trip.stats.avg_speed, 24.0);
        assert_eq!(helper.storage.all_alerts().len(), 2);
    })
    .await;
}

#[tokio::test]
async fn test_entering_a_zone_a_minute_into_a_trip() {
    test(|helper| async move {
        let entity_id = helper.add_courier();
        let trip = helper.start_trip(entity_id).await;
        let zone = helper.storage.add_geofence(
            "pickup",
            GeofenceShape::Circle {
                center: Coordinate::new(59.91, 10.75),
                radius_meters: 200.0,
            },
        );
        let mut entity = helper.publisher.subscribe(Topic::Entity(entity_id));
        let start = Utc.with_ymd_and_hms(2024, 9, 2, 7, 0, 0).unwrap();

        helper
            .ingest_at(entity_id, Coordinate::new(59.90, 10.75), start, Some(30.0))
            .await;
        let inside = helper
            .ingest_at(
                entity_id,
                Coordinate::new(59.91, 10.75),
                start + Duration::seconds(60),
                Some(40.0),
            )
            .await;

        let events = drain(&mut entity);
        let count = |name| events.iter().filter(|e| kind(e) == name).count();
        assert_eq!(count("position"), 2);
        assert_eq!(count("enter"), 1);
        assert_eq!(count("exit"), 0);
        assert!(events.iter().any(|e| matches!(
            e,
            TrackingEvent::GeofenceEnter { geofence_id, position_id, .. }
                if *geofence_id == zone && *position_id == inside
        )));

        let trip = helper.storage.trip(trip.id).await.unwrap().unwrap();
        assert_eq!(trip.status, TripStatus::InProgress);
        assert!((trip.stats.distance_km - 1.112).abs() < 0.01, "{:?}", trip.stats);
        assert_eq!(trip.stats.duration_minutes, 1.0);
        assert_eq!(trip.stats.max_speed, 40.0);
    })
    .await;
}
