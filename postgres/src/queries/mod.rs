mod alert;
mod delivery;
mod entity;
mod geofence;
mod position;
mod trip;
