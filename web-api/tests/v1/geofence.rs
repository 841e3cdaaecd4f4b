use reqwest::StatusCode;
use tracking_core::{Coordinate, GeofenceShape};
use web_api::error::ErrorDiscriminants;

use super::helper::test;

#[tokio::test]
async fn test_membership_reports_every_active_geofence() {
    test(|helper| async move {
        let depot = helper.storage.add_geofence(
            "depot",
            GeofenceShape::Circle {
                center: Coordinate::new(59.91, 10.75),
                radius_meters: 500.0,
            },
        );
        let harbour = helper.storage.add_geofence(
            "harbour",
            GeofenceShape::Polygon {
                ring: vec![
                    Coordinate::new(59.0, 11.0),
                    Coordinate::new(59.0, 11.1),
                    Coordinate::new(59.1, 11.1),
                    Coordinate::new(59.1, 11.0),
                ],
            },
        );
        let closed = helper.storage.add_geofence(
            "closed",
            GeofenceShape::Circle {
                center: Coordinate::new(59.91, 10.75),
                radius_meters: 500.0,
            },
        );
        helper.storage.set_geofence_active(closed, false);

        let mut membership = helper.app.membership(59.911, 10.751).await.unwrap();
        membership.sort_by_key(|m| m.geofence_id);

        assert_eq!(membership.len(), 2);
        assert_eq!(membership[0].geofence_id, depot);
        assert!(membership[0].inside);
        assert_eq!(membership[1].geofence_id, harbour);
        assert!(!membership[1].inside);
    })
    .await;
}

#[tokio::test]
async fn test_membership_rejects_invalid_coordinate() {
    test(|helper| async move {
        let error = helper.app.membership(12.0, 181.0).await.unwrap_err();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.error, ErrorDiscriminants::Validation);
    })
    .await;
}
