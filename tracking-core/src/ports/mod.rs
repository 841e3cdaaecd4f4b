mod inbound;
mod outbound;

pub use inbound::*;
pub use outbound::*;

/// Every storage port the tracking pipeline depends on.
pub trait TrackingStorage:
    PositionInbound
    + PositionOutbound
    + EntityInbound
    + EntityOutbound
    + TripInbound
    + TripOutbound
    + GeofenceOutbound
    + AlertInbound
    + DeliveryInbound
    + DeliveryOutbound
    + Send
    + Sync
    + 'static
{
}

impl<T> TrackingStorage for T where
    T: PositionInbound
        + PositionOutbound
        + EntityInbound
        + EntityOutbound
        + TripInbound
        + TripOutbound
        + GeofenceOutbound
        + AlertInbound
        + DeliveryInbound
        + DeliveryOutbound
        + Send
        + Sync
        + 'static
{
}
