use crate::{
    constants::TARGET_MOVING_SPEED,
    types::{ActorHandle, Quat, Vec3},
};

/// Anything a pet can follow.
pub trait Followable {
    fn position(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    fn velocity(&self) -> Vec3;

    /// World entity backing this object, excluded from the pet's ray probes.
    fn handle(&self) -> Option<ActorHandle> {
        None
    }
}

/// Snapshot of the followed object for one control cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub handle: Option<ActorHandle>,
}

impl Target {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::identity(),
            velocity: Vec3::zeros(),
            handle: None,
        }
    }

    pub fn follow(source: &dyn Followable) -> Self {
        Self {
            position: source.position(),
            rotation: source.rotation(),
            velocity: source.velocity(),
            handle: source.handle(),
        }
    }

    pub fn is_moving(&self) -> bool {
        self.velocity.norm() > TARGET_MOVING_SPEED
    }
}

impl Followable for Target {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn handle(&self) -> Option<ActorHandle> {
        self.handle
    }
}
