use std::time::Duration;

use processors::EventPublisher;
use tracking_core::{EntityId, Topic, TrackingEvent, TripId, TripStats};

fn stats_event(trip_id: i64) -> TrackingEvent {
    TrackingEvent::TripStatsUpdated {
        entity_id: EntityId::new(1),
        trip_id: TripId::new(trip_id),
        stats: TripStats::default(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_stable_subscriber_sees_every_event_despite_churn() {
    let publisher = EventPublisher::new(1024);
    let mut stable = publisher.subscribe(Topic::AllEntities);

    let churn = {
        let publisher = publisher.clone();
        tokio::spawn(async move {
            for _ in 0..500 {
                let subscription = publisher.subscribe(Topic::AllEntities);
                tokio::task::yield_now().await;
                publisher.unsubscribe(subscription);
            }
        })
    };

    let producer = {
        let publisher = publisher.clone();
        tokio::spawn(async move {
            for id in 0..500 {
                assert!(publisher.publish(Topic::AllEntities, stats_event(id)) >= 1);
                tokio::task::yield_now().await;
            }
        })
    };

    producer.await.unwrap();
    churn.await.unwrap();

    let mut received = Vec::with_capacity(500);
    while received.len() < 500 {
        let event = tokio::time::timeout(Duration::from_secs(5), stable.recv())
            .await
            .unwrap()
            .unwrap();
        let TrackingEvent::TripStatsUpdated { trip_id, .. } = event else {
            panic!("unexpected event");
        };
        received.push(trip_id.into_inner());
    }

    assert_eq!(received, (0..500).collect::<Vec<_>>());
    assert_eq!(publisher.subscriber_count(Topic::AllEntities), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_subscribers_are_fully_registered_or_absent() {
    let publisher = EventPublisher::new(16);

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let publisher = publisher.clone();
            tokio::spawn(async move {
                let topic = Topic::Entity(EntityId::new(i % 4));
                let mut subscription = publisher.subscribe(topic);
                publisher.publish(topic, stats_event(i));
                // Our own event, or one of a concurrent subscriber on the same topic.
                tokio::time::timeout(Duration::from_secs(5), subscription.recv())
                    .await
                    .unwrap()
                    .is_some()
            })
        })
        .collect();

    for task in tasks {
        assert!(task.await.unwrap());
    }

    assert_eq!(publisher.topic_count(), 0);
}
