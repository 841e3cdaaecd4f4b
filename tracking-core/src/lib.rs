#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Domain model, pure computations and storage ports shared by every crate in the
//! tracking workspace.

mod domain;
mod environment;
mod error;
pub mod geometry;
mod ports;
pub mod trip_stats;

#[cfg(feature = "test")]
pub mod test_helper;

pub use domain::*;
pub use environment::*;
pub use error::*;
pub use ports::*;
