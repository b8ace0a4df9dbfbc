//! Frame and shutdown subscriptions.
//!
//! The scheduler only hands out and revokes [`Subscription`] tokens. It never
//! dispatches anything: the host owns the frame loop and calls
//! `Critter::on_tick` and `Critter::on_shutdown` directly. Those entry points
//! act only while the pet's tokens are still connected. Teardown deregisters
//! the tokens, so a pet that was torn down ignores any call it still receives
//! during the same frame.

use std::collections::BTreeMap;

/// Host notifications a pet can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Signal {
    /// Delivered once per frame with the elapsed time.
    Update,
    /// Delivered once when the host stops.
    Shutdown,
}

/// Token for one connection to a [`Signal`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subscription {
    id: u64,
    signal: Signal,
}

impl Subscription {
    pub fn signal(&self) -> Signal {
        self.signal
    }
}

pub trait Scheduler {
    fn connect(&mut self, signal: Signal) -> Subscription;

    /// Disconnecting twice is a no-op.
    fn disconnect(&mut self, subscription: Subscription);

    fn is_connected(&self, subscription: Subscription) -> bool;
}

/// Single-threaded scheduler driven by the host's own frame loop.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    live: BTreeMap<u64, Signal>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live subscriptions to `signal`.
    pub fn connected(&self, signal: Signal) -> usize {
        self.live.values().filter(|s| **s == signal).count()
    }
}

impl Scheduler for FrameScheduler {
    fn connect(&mut self, signal: Signal) -> Subscription {
        self.next_id += 1;
        self.live.insert(self.next_id, signal);
        Subscription {
            id: self.next_id,
            signal,
        }
    }

    fn disconnect(&mut self, subscription: Subscription) {
        self.live.remove(&subscription.id);
    }

    fn is_connected(&self, subscription: Subscription) -> bool {
        self.live.get(&subscription.id) == Some(&subscription.signal)
    }
}
