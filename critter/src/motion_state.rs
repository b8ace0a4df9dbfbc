/*!
Motion state of a pet, recomputed from scratch every control cycle.

Each state owns its own bit (see [`MotionFlag`]), so membership tests never
confuse a composite state with a single one. Animation code can either test
flags or ask for the two mutually exclusive summaries:
- [`Locomotion`]: Idle, MovingSlow, Moving, MovingFast
- [`Vertical`]:   Grounded, Falling, Jumping, Flying
*/

use crate::{
    bitmask_flags::BitmaskFlags,
    constants::TURN_IN_PLACE_RATE,
    rules::Rules,
    types::Vec3,
};

crate::define_bitmask_flags!(MotionFlag, u8, {
    Moving,
    MovingFast,
    MovingSlow,
    Falling,
    Jumping,
    Flying,
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Locomotion {
    Idle,
    MovingSlow,
    Moving,
    MovingFast,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Vertical {
    Grounded,
    Falling,
    Jumping,
    Flying,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MotionState {
    flags: BitmaskFlags<u8>,
}

impl MotionState {
    pub fn bits(&self) -> u8 {
        self.flags.bits()
    }

    pub fn has(&self, flag: MotionFlag) -> bool {
        self.flags.has(flag)
    }

    pub fn is_moving(&self) -> bool {
        self.has(MotionFlag::Moving)
    }

    pub fn is_moving_fast(&self) -> bool {
        self.has(MotionFlag::MovingFast)
    }

    pub fn is_moving_slow(&self) -> bool {
        self.has(MotionFlag::MovingSlow)
    }

    pub fn is_falling(&self) -> bool {
        self.has(MotionFlag::Falling)
    }

    pub fn is_jumping(&self) -> bool {
        self.has(MotionFlag::Jumping)
    }

    pub fn is_flying(&self) -> bool {
        self.has(MotionFlag::Flying)
    }

    pub fn locomotion(&self) -> Locomotion {
        if self.is_moving_fast() {
            Locomotion::MovingFast
        } else if self.is_moving() {
            Locomotion::Moving
        } else if self.is_moving_slow() {
            Locomotion::MovingSlow
        } else {
            Locomotion::Idle
        }
    }

    /// Flying wins over the velocity based vertical flags.
    pub fn vertical(&self) -> Vertical {
        if self.is_flying() {
            Vertical::Flying
        } else if self.is_jumping() {
            Vertical::Jumping
        } else if self.is_falling() {
            Vertical::Falling
        } else {
            Vertical::Grounded
        }
    }
}

/// Inputs of the classifier for one cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSample {
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Whether locomotion mode selection left the pet flying.
    pub flying: bool,
}

/// Classify one cycle's outcome. Pure: the same sample and rules always give the same state.
pub fn classify(sample: &MotionSample, rules: &Rules) -> MotionState {
    let mut flags = BitmaskFlags::<u8>::empty();

    if sample.flying {
        flags.add(MotionFlag::Flying);
    }

    if sample.velocity.y > rules.flight_velocity {
        flags.add(MotionFlag::Jumping);
    } else if sample.velocity.y < rules.falling_threshold {
        flags.add(MotionFlag::Falling);
    }

    let speed = sample.velocity.norm();
    if speed > rules.velocity_threshold {
        flags.add(MotionFlag::Moving);
        if speed > rules.velocity_fast {
            flags.add(MotionFlag::MovingFast);
        }
    } else if sample.angular_velocity.norm() > TURN_IN_PLACE_RATE {
        flags.add(MotionFlag::MovingSlow);
    }

    MotionState { flags }
}
