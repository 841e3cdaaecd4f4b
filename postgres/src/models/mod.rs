use std::str::FromStr;

use crate::error::{Result, error::UnknownValueSnafu};

mod alert;
mod delivery;
mod entity;
mod geofence;
mod position;
mod trip;

pub use alert::*;
pub use delivery::*;
pub use entity::*;
pub use geofence::*;
pub use position::*;
pub use trip::*;

/// Enums are stored as their snake_case text representation.
fn parse_column<T: FromStr>(column: &'static str, value: String) -> Result<T> {
    match value.parse() {
        Ok(v) => Ok(v),
        Err(_) => UnknownValueSnafu { column, value }.fail(),
    }
}
