use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use snafu::{Location, Snafu};
use strum::EnumDiscriminants;
use tracing::error;
use tracking_core::{DeliveryId, DeliveryStatus, EntityId, TopicError, TripId, ValidationError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu, EnumDiscriminants)]
#[snafu(module, visibility(pub))]
#[strum_discriminants(derive(Deserialize, Serialize))]
pub enum Error {
    #[snafu(display("{source}"))]
    Validation {
        #[snafu(implicit)]
        location: Location,
        source: ValidationError,
    },
    #[snafu(display("{source}"))]
    Topic {
        #[snafu(implicit)]
        location: Location,
        source: TopicError,
    },
    #[snafu(display("{message}"))]
    InvalidInput {
        #[snafu(implicit)]
        location: Location,
        message: String,
    },
    #[snafu(display("Entity '{entity_id}' does not exist"))]
    EntityNotFound {
        #[snafu(implicit)]
        location: Location,
        entity_id: EntityId,
    },
    #[snafu(display("Delivery '{delivery_id}' does not exist"))]
    DeliveryNotFound {
        #[snafu(implicit)]
        location: Location,
        delivery_id: DeliveryId,
    },
    #[snafu(display("Trip '{trip_id}' does not exist"))]
    TripNotFound {
        #[snafu(implicit)]
        location: Location,
        trip_id: TripId,
    },
    #[snafu(display("Entity '{entity_id}' already has a trip in progress"))]
    TripInProgress {
        #[snafu(implicit)]
        location: Location,
        entity_id: EntityId,
    },
    #[snafu(display("Trip '{trip_id}' has already finished"))]
    TripFinished {
        #[snafu(implicit)]
        location: Location,
        trip_id: TripId,
    },
    #[snafu(display("Delivery '{delivery_id}' is '{status}' and accepts no more positions"))]
    DeliveryClosed {
        #[snafu(implicit)]
        location: Location,
        delivery_id: DeliveryId,
        status: DeliveryStatus,
    },
    #[snafu(display("An internal server error occured"))]
    Internal {
        #[snafu(implicit)]
        location: Location,
        source: tracking_core::Error,
    },
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDiscriminants,
    pub description: String,
}

#[track_caller]
fn caller_location() -> Location {
    let location = std::panic::Location::caller();
    Location::new(location.file(), location.line(), location.column())
}

impl From<tracking_core::Error> for Error {
    #[track_caller]
    fn from(value: tracking_core::Error) -> Self {
        let location = caller_location();
        match value {
            tracking_core::Error::EntityMissing { entity_id, .. } => Error::EntityNotFound {
                location,
                entity_id,
            },
            tracking_core::Error::DeliveryMissing { delivery_id, .. } => {
                Error::DeliveryNotFound {
                    location,
                    delivery_id,
                }
            }
            tracking_core::Error::TripNotFound { trip_id, .. } => Error::TripNotFound {
                location,
                trip_id,
            },
            tracking_core::Error::TripInProgress { entity_id, .. } => Error::TripInProgress {
                location,
                entity_id,
            },
            tracking_core::Error::TripFinished { trip_id, .. } => Error::TripFinished {
                location,
                trip_id,
            },
            source @ (tracking_core::Error::Storage { .. }
            | tracking_core::Error::Routing { .. }) => Error::Internal { location, source },
        }
    }
}

impl From<processors::Error> for Error {
    #[track_caller]
    fn from(value: processors::Error) -> Self {
        let location = caller_location();
        match value {
            processors::Error::Validation { source, .. } => Error::Validation { location, source },
            processors::Error::EntityNotFound { entity_id, .. } => Error::EntityNotFound {
                location,
                entity_id,
            },
            processors::Error::DeliveryNotFound { delivery_id, .. } => Error::DeliveryNotFound {
                location,
                delivery_id,
            },
            processors::Error::DeliveryClosed {
                delivery_id,
                status,
                ..
            } => Error::DeliveryClosed {
                location,
                delivery_id,
                status,
            },
            processors::Error::Storage { source, .. } => source.into(),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation { .. } | Error::Topic { .. } | Error::InvalidInput { .. } => {
                StatusCode::BAD_REQUEST
            }
            Error::EntityNotFound { .. }
            | Error::DeliveryNotFound { .. }
            | Error::TripNotFound { .. } => StatusCode::NOT_FOUND,
            Error::TripInProgress { .. }
            | Error::TripFinished { .. }
            | Error::DeliveryClosed { .. } => StatusCode::CONFLICT,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Error::Internal { .. } = self {
            error!("{self:?}");
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.into(),
            description: self.to_string(),
        })
    }
}
