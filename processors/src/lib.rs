#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! The position processing pipeline: ingestion, trip aggregation, geofencing, delivery
//! relaying and real-time event distribution.

mod delivery;
mod error;
mod geofence;
mod ingest;
mod publisher;
mod trip_aggregator;

pub use delivery::*;
pub use error::{Error, Result};
pub use geofence::*;
pub use ingest::*;
pub use publisher::*;
pub use trip_aggregator::*;
