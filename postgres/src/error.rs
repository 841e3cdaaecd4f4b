use snafu::{IntoError, Location, Snafu};
use tracking_core::core_error::StorageSnafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to acquire a database connection"))]
    Connection {
        #[snafu(implicit)]
        location: Location,
        source: sqlx::Error,
    },
    #[snafu(display("Failed to run database migrations"))]
    Migration {
        #[snafu(implicit)]
        location: Location,
        source: sqlx::migrate::MigrateError,
    },
    #[snafu(display("A query related error occured"))]
    Query {
        #[snafu(implicit)]
        location: Location,
        source: sqlx::Error,
    },
    #[snafu(display("Failed to convert a json column"))]
    Json {
        #[snafu(implicit)]
        location: Location,
        source: serde_json::Error,
    },
    #[snafu(display("Column '{column}' contains the unknown value '{value}'"))]
    UnknownValue {
        #[snafu(implicit)]
        location: Location,
        column: &'static str,
        value: String,
    },
}

impl From<sqlx::Error> for Error {
    #[track_caller]
    fn from(value: sqlx::Error) -> Self {
        let location = std::panic::Location::caller();
        Error::Query {
            location: Location::new(location.file(), location.line(), location.column()),
            source: value,
        }
    }
}

impl From<Error> for tracking_core::Error {
    #[track_caller]
    fn from(value: Error) -> Self {
        StorageSnafu.into_error(Box::new(value))
    }
}
