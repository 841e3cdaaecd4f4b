#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! HTTP client for the external routing service that estimates remaining travel distance and
//! time of a delivery.

mod client;
mod error;
mod settings;

pub use client::RoutingClient;
pub use error::{Error, Result};
pub use settings::RoutingSettings;
