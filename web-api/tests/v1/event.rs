use reqwest::StatusCode;
use tracking_core::{DeliveryPositionReport, PositionReport};
use web_api::error::ErrorDiscriminants;

use super::{helper::test, test_client::next_event};

#[tokio::test]
async fn test_entity_stream_receives_position_updates() {
    test(|helper| async move {
        let entity_id = helper.add_courier();
        let mut stream = helper.app.entity_events(entity_id).await;

        let created = helper
            .app
            .add_position(&PositionReport {
                entity_id,
                latitude: 59.91,
                longitude: 10.75,
                altitude: None,
                speed: None,
                heading: None,
                accuracy: None,
                battery_level: None,
                timestamp: None,
            })
            .await
            .unwrap();

        let event = next_event(&mut stream).await;
        assert_eq!(event["type"], "PositionUpdate");
        assert_eq!(
            event["position"]["id"].as_i64(),
            Some(created.position_id.into_inner())
        );
        assert_eq!(
            event["position"]["entityId"].as_i64(),
            Some(entity_id.into_inner())
        );
    })
    .await;
}

#[tokio::test]
async fn test_order_stream_receives_delivery_position_updates() {
    test(|helper| async move {
        let (delivery_id, order_id) = helper.add_delivery();
        let mut stream = helper.app.order_events(order_id).await;

        helper
            .app
            .add_delivery_position(
                delivery_id,
                &DeliveryPositionReport {
                    latitude: 59.92,
                    longitude: 10.76,
                    speed: None,
                    heading: None,
                    accuracy: None,
                    timestamp: None,
                },
            )
            .await
            .unwrap();

        let event = next_event(&mut stream).await;
        assert_eq!(event["type"], "DeliveryPositionUpdate");
        assert_eq!(event["deliveryId"].as_i64(), Some(delivery_id.into_inner()));
        assert_eq!(event["orderId"].as_i64(), Some(order_id.into_inner()));
    })
    .await;
}

#[tokio::test]
async fn test_topic_stream_by_name_receives_position_updates() {
    test(|helper| async move {
        let entity_id = helper.add_courier();
        let mut stream = helper
            .app
            .topic_events(&format!("entity:{entity_id}"))
            .await
            .unwrap();

        helper
            .app
            .add_position(&PositionReport {
                entity_id,
                latitude: 59.91,
                longitude: 10.75,
                altitude: None,
                speed: None,
                heading: None,
                accuracy: None,
                battery_level: None,
                timestamp: None,
            })
            .await
            .unwrap();

        let event = next_event(&mut stream).await;
        assert_eq!(event["type"], "PositionUpdate");
        assert_eq!(
            event["position"]["entityId"].as_i64(),
            Some(entity_id.into_inner())
        );
    })
    .await;
}

#[tokio::test]
async fn test_unknown_topic_is_rejected() {
    test(|helper| async move {
        for topic in ["vessel:1", "entity:abc", "entity"] {
            let error = helper.app.topic_events(topic).await.unwrap_err();
            assert_eq!(error.status, StatusCode::BAD_REQUEST);
            assert_eq!(error.error, ErrorDiscriminants::Topic);
            assert!(error.description.contains(topic), "{}", error.description);
        }
    })
    .await;
}
