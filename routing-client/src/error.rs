use reqwest::StatusCode;
use snafu::{IntoError, Location, Snafu};
use tracking_core::core_error::RoutingSnafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("HTTP reqwest error"))]
    Reqwest {
        #[snafu(implicit)]
        location: Location,
        source: reqwest::Error,
    },
    #[snafu(display("HTTP middleware error"))]
    Middleware {
        #[snafu(implicit)]
        location: Location,
        source: reqwest_middleware::Error,
    },
    #[snafu(display("HTTP request failed, status: '{status}', url: '{url}', body: '{body}'"))]
    FailedRequest {
        #[snafu(implicit)]
        location: Location,
        url: String,
        status: StatusCode,
        body: String,
    },
}

impl Error {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::FailedRequest { status, .. } => Some(*status),
            Error::Reqwest { .. } | Error::Middleware { .. } => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    #[track_caller]
    fn from(value: reqwest::Error) -> Self {
        let location = std::panic::Location::caller();
        Error::Reqwest {
            location: Location::new(location.file(), location.line(), location.column()),
            source: value,
        }
    }
}

impl From<reqwest_middleware::Error> for Error {
    #[track_caller]
    fn from(value: reqwest_middleware::Error) -> Self {
        let location = std::panic::Location::caller();
        Error::Middleware {
            location: Location::new(location.file(), location.line(), location.column()),
            source: value,
        }
    }
}

impl From<Error> for tracking_core::Error {
    #[track_caller]
    fn from(value: Error) -> Self {
        RoutingSnafu.into_error(Box::new(value))
    }
}
