use snafu::{Location, Snafu};
use tracking_core::{DeliveryId, DeliveryStatus, EntityId, ValidationError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Invalid position report"))]
    Validation {
        #[snafu(implicit)]
        location: Location,
        source: ValidationError,
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
    #[snafu(display("Delivery '{delivery_id}' is '{status}' and accepts no more positions"))]
    DeliveryClosed {
        #[snafu(implicit)]
        location: Location,
        delivery_id: DeliveryId,
        status: DeliveryStatus,
    },
    #[snafu(display("Failed a storage operation"))]
    Storage {
        #[snafu(implicit)]
        location: Location,
        source: tracking_core::Error,
    },
}

impl From<tracking_core::Error> for Error {
    #[track_caller]
    fn from(value: tracking_core::Error) -> Self {
        let location = std::panic::Location::caller();
        Error::Storage {
            location: Location::new(location.file(), location.line(), location.column()),
            source: value,
        }
    }
}
