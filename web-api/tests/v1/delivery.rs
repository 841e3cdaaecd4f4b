use std::time::Duration;

use reqwest::StatusCode;
use tracking_core::{DeliveryId, DeliveryPositionReport, DeliveryStatus};
use web_api::error::ErrorDiscriminants;

use super::helper::test;

fn report() -> DeliveryPositionReport {
    DeliveryPositionReport {
        latitude: 59.92,
        longitude: 10.76,
        speed: Some(8.0),
        heading: None,
        accuracy: None,
        timestamp: None,
    }
}

#[tokio::test]
async fn test_delivery_position_is_stored_and_route_estimated() {
    test(|helper| async move {
        let (delivery_id, _) = helper.add_delivery();

        let created = helper
            .app
            .add_delivery_position(delivery_id, &report())
            .await
            .unwrap();

        let positions = helper.storage.all_delivery_positions();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].id, created.position_id);
        assert_eq!(positions[0].delivery_id, delivery_id);

        let mut attempts = 0;
        while helper.routing.calls().is_empty() && attempts < 50 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            attempts += 1;
        }
        assert_eq!(helper.routing.calls().len(), 1);
    })
    .await;
}

#[tokio::test]
async fn test_delivered_delivery_rejects_positions() {
    test(|helper| async move {
        let (delivery_id, _) = helper.add_delivery();
        helper
            .storage
            .set_delivery_status(delivery_id, DeliveryStatus::Delivered);

        let error = helper
            .app
            .add_delivery_position(delivery_id, &report())
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::CONFLICT);
        assert_eq!(error.error, ErrorDiscriminants::DeliveryClosed);
        assert!(helper.storage.all_delivery_positions().is_empty());
    })
    .await;
}

#[tokio::test]
async fn test_unknown_delivery_is_not_found() {
    test(|helper| async move {
        let error = helper
            .app
            .add_delivery_position(DeliveryId::new(12_345), &report())
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::NOT_FOUND);
        assert_eq!(error.error, ErrorDiscriminants::DeliveryNotFound);
    })
    .await;
}
