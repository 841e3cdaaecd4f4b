use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
    time::Duration,
};

use tokio::time::Instant;
use tracking_core::{Coordinate, DeliveryId, OrderId};

/// Recompute the route of a delivery from the courier's position to its destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EtaRequest {
    pub delivery_id: DeliveryId,
    pub order_id: OrderId,
    pub from: Coordinate,
    pub to: Coordinate,
}

/// What the caller must do with a request offered to the throttle.
#[derive(Debug, Clone, PartialEq)]
pub enum Offer {
    /// Nothing dispatched within the cooldown and no lookup running, dispatch right away.
    Dispatch(EtaRequest),
    /// Stored as pending, a flush must run after `delay`.
    Schedule { delay: Duration },
    /// Stored as pending behind an already scheduled flush or a running lookup.
    Coalesced,
}

#[derive(Debug, Default)]
struct ThrottleState {
    last_dispatch: Option<Instant>,
    pending: Option<EtaRequest>,
    flush_scheduled: bool,
    in_flight: bool,
}

impl ThrottleState {
    fn is_idle(&self, now: Instant, cooldown: Duration) -> bool {
        !self.flush_scheduled
            && !self.in_flight
            && self.pending.is_none()
            && self
                .last_dispatch
                .is_none_or(|last| now.duration_since(last) >= cooldown)
    }

    fn next(&mut self, now: Instant, cooldown: Duration) -> Offer {
        if self.in_flight || self.flush_scheduled {
            return Offer::Coalesced;
        }

        match self.last_dispatch.map(|last| now.duration_since(last)) {
            Some(elapsed) if elapsed < cooldown => {
                self.flush_scheduled = true;
                Offer::Schedule {
                    delay: cooldown - elapsed,
                }
            }
            _ => match self.pending.take() {
                Some(request) => {
                    self.last_dispatch = Some(now);
                    self.in_flight = true;
                    Offer::Dispatch(request)
                }
                None => Offer::Coalesced,
            },
        }
    }
}

/// Per delivery rate limiting of routing lookups with a trailing flush of the most
/// recent request. At most one lookup per delivery runs at any time.
#[derive(Debug)]
pub struct EtaThrottle {
    cooldown: Duration,
    states: Mutex<HashMap<DeliveryId, ThrottleState>>,
}

impl EtaThrottle {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            states: Mutex::new(HashMap::new()),
        }
    }

    pub fn offer(&self, request: EtaRequest) -> Offer {
        let now = Instant::now();
        let mut states = self.states.lock().unwrap_or_else(PoisonError::into_inner);

        // Idle deliveries behave exactly like unseen ones.
        states.retain(|_, s| !s.is_idle(now, self.cooldown));

        let state = states.entry(request.delivery_id).or_default();
        state.pending = Some(request);
        state.next(now, self.cooldown)
    }

    /// Called by the scheduled flush, returns the latest pending request if it can be
    /// dispatched now. While a lookup is running the request stays pending for
    /// [`EtaThrottle::complete`].
    pub fn take_pending(&self, delivery_id: DeliveryId) -> Option<EtaRequest> {
        let mut states = self.states.lock().unwrap_or_else(PoisonError::into_inner);
        let state = states.get_mut(&delivery_id)?;

        state.flush_scheduled = false;
        if state.in_flight {
            return None;
        }

        let pending = state.pending.take()?;
        state.last_dispatch = Some(Instant::now());
        state.in_flight = true;
        Some(pending)
    }

    /// Marks the running lookup of the delivery as finished and decides what to do with
    /// a request that arrived meanwhile. Returns `None` when nothing is pending.
    pub fn complete(&self, delivery_id: DeliveryId) -> Option<Offer> {
        let mut states = self.states.lock().unwrap_or_else(PoisonError::into_inner);
        let state = states.get_mut(&delivery_id)?;

        state.in_flight = false;
        if state.pending.is_none() {
            return None;
        }

        Some(state.next(Instant::now(), self.cooldown))
    }
}
