mod alert;
mod coordinate;
mod delivery;
mod entity;
mod event;
mod geofence;
mod ids;
mod position;
mod trip;

pub use alert::*;
pub use coordinate::*;
pub use delivery::*;
pub use entity::*;
pub use event::*;
pub use geofence::*;
pub use ids::*;
pub use position::*;
pub use trip::*;
