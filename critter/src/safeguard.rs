use crate::constants::RUNAWAY_LIMIT_S;

/// Seconds the pet has spent out of control, net of the time it spent in control.
///
/// Never negative. Once it passes [`RUNAWAY_LIMIT_S`] the pet is reset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlSafeguard {
    seconds: f32,
}

impl ControlSafeguard {
    pub fn seconds(&self) -> f32 {
        self.seconds
    }

    /// Charge `dt` seconds of out-of-control time.
    pub fn penalize(&mut self, dt: f32) {
        self.seconds += dt;
    }

    /// Refund `dt` seconds, floored at zero.
    pub fn relax(&mut self, dt: f32) {
        self.seconds = (self.seconds - dt).max(0.0);
    }

    /// Charge or refund depending on whether the angular speed exceeds twice the turn limit.
    pub fn record_spin(&mut self, angular_speed: f32, max_turn_rate: f32, dt: f32) {
        if angular_speed > 2.0 * max_turn_rate {
            self.penalize(dt);
        } else {
            self.relax(dt);
        }
    }

    /// If the limit has been passed, reset to zero and return the time that tripped it.
    pub fn trip(&mut self) -> Option<f32> {
        if self.seconds > RUNAWAY_LIMIT_S {
            let seconds = self.seconds;
            self.seconds = 0.0;
            Some(seconds)
        } else {
            None
        }
    }
}
