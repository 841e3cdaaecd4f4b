use snafu::{Location, Snafu};

use crate::{DeliveryId, EntityId, TripId};

pub type Result<T> = std::result::Result<T, Error>;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the storage and routing ports.
#[derive(Debug, Snafu)]
#[snafu(module(core_error), visibility(pub))]
pub enum Error {
    #[snafu(display("Failed a storage operation"))]
    Storage {
        #[snafu(implicit)]
        location: Location,
        source: BoxedError,
    },
    #[snafu(display("Failed to estimate a route"))]
    Routing {
        #[snafu(implicit)]
        location: Location,
        source: BoxedError,
    },
    #[snafu(display("Entity '{entity_id}' does not exist"))]
    EntityMissing {
        #[snafu(implicit)]
        location: Location,
        entity_id: EntityId,
    },
    #[snafu(display("Entity '{entity_id}' already has a trip in progress"))]
    TripInProgress {
        #[snafu(implicit)]
        location: Location,
        entity_id: EntityId,
    },
    #[snafu(display("Trip '{trip_id}' does not exist"))]
    TripNotFound {
        #[snafu(implicit)]
        location: Location,
        trip_id: TripId,
    },
    #[snafu(display("Trip '{trip_id}' has already finished"))]
    TripFinished {
        #[snafu(implicit)]
        location: Location,
        trip_id: TripId,
    },
    #[snafu(display("Delivery '{delivery_id}' does not exist"))]
    DeliveryMissing {
        #[snafu(implicit)]
        location: Location,
        delivery_id: DeliveryId,
    },
}

/// Rejections of a position report, raised before anything is persisted.
#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(module, visibility(pub))]
pub enum ValidationError {
    #[snafu(display("Field '{field}' must be a finite number, got '{value}'"))]
    NotFinite { field: &'static str, value: f64 },
    #[snafu(display("Latitude '{value}' is outside of [-90, 90]"))]
    Latitude { value: f64 },
    #[snafu(display("Longitude '{value}' is outside of [-180, 180]"))]
    Longitude { value: f64 },
    #[snafu(display("Speed '{value}' cannot be negative"))]
    Speed { value: f64 },
    #[snafu(display("Heading '{value}' is outside of [0, 360]"))]
    Heading { value: f64 },
    #[snafu(display("Accuracy '{value}' cannot be negative"))]
    Accuracy { value: f64 },
    #[snafu(display("Battery level '{value}' is outside of [0, 100]"))]
    BatteryLevel { value: f64 },
}

/// Reasons a stored geofence shape cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(module, visibility(pub))]
pub enum GeometryError {
    #[snafu(display("Radius '{radius}' must be a finite, non-negative number of meters"))]
    Radius { radius: f64 },
    #[snafu(display("Polygon ring has {count} distinct vertices, at least 3 are required"))]
    TooFewVertices { count: usize },
    #[snafu(display("Vertex at index {index} is not a valid coordinate"))]
    Vertex {
        index: usize,
        source: ValidationError,
    },
    #[snafu(display("Circle center is not a valid coordinate"))]
    Center { source: ValidationError },
}

/// Reasons a topic name could not be parsed.
#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(module, visibility(pub))]
pub enum TopicError {
    #[snafu(display("Unknown topic '{topic}'"))]
    Unknown { topic: String },
    #[snafu(display("Topic '{topic}' does not carry a valid id"))]
    Id {
        topic: String,
        source: std::num::ParseIntError,
    },
}
