#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! HTTP boundary of the tracking service: position ingestion, delivery relaying, geofence
//! queries, trip lifecycle and Server-Sent Event subscriptions.

pub mod error;
pub mod response;
pub mod routes;
pub mod settings;
pub mod startup;
pub mod states;
pub mod telemetry;
