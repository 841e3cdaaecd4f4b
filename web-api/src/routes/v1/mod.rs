use actix_web::{Scope, web};
use serde::{Deserialize, Serialize};
use tracking_core::{DeliveryId, EntityId, OrderId, TripId};

pub mod delivery;
pub mod event;
pub mod geofence;
pub mod position;
pub mod trip;

#[derive(Debug, Deserialize, Serialize)]
pub struct EntityPath {
    pub entity_id: EntityId,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TripPath {
    pub trip_id: TripId,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DeliveryPath {
    pub delivery_id: DeliveryId,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OrderPath {
    pub order_id: OrderId,
}

pub fn scope() -> Scope {
    web::scope("/v1.0")
        .route("/positions", web::post().to(position::add_position))
        .route(
            "/entities/{entity_id}/positions/latest",
            web::get().to(position::latest_position),
        )
        .route(
            "/deliveries/{delivery_id}/positions",
            web::post().to(delivery::add_delivery_position),
        )
        .route(
            "/geofences/membership",
            web::get().to(geofence::membership),
        )
        .route(
            "/entities/{entity_id}/trips",
            web::post().to(trip::start_trip),
        )
        .route(
            "/entities/{entity_id}/trips/current",
            web::get().to(trip::current_trip),
        )
        .route("/trips/{trip_id}/complete", web::put().to(trip::complete_trip))
        .route("/trips/{trip_id}/cancel", web::put().to(trip::cancel_trip))
        .route("/events", web::get().to(event::topic))
        .route("/events/entities", web::get().to(event::all_entities))
        .route("/events/entities/{entity_id}", web::get().to(event::entity))
        .route("/events/orders/{order_id}", web::get().to(event::order))
        .route(
            "/events/deliveries/{delivery_id}",
            web::get().to(event::delivery),
        )
}
