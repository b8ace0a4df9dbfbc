/*!
Core data types exchanged between the controller and the world store.

This module intentionally contains no algorithms. It defines:
- math aliases shared by every module
- the opaque actor handle
- the per-tick property snapshot and the partial update committed back
- the template a pet is spawned from
*/

use nalgebra as na;

use crate::bitmask_flags::BitmaskFlags;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;

/// Opaque identifier of an entity living in the world store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorHandle(pub u64);

impl std::fmt::Display for ActorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// Animation playing on an actor. The clip itself is owned by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    pub url: String,
    pub fps: f32,
    pub first_frame: f32,
    pub last_frame: f32,
    pub looping: bool,
    pub running: bool,
    /// Playback cursor. Driven by the host's animation system; never committed by the controller.
    pub current_frame: Option<f32>,
}

impl Animation {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fps: 30.0,
            first_frame: 0.0,
            last_frame: 0.0,
            looping: true,
            running: true,
            current_frame: None,
        }
    }
}

crate::define_bitmask_flags!(PropertyField, u8, {
    Position,
    Rotation,
    Velocity,
    AngularVelocity,
    Animation,
});

/// Which fields a property query should fill in.
pub type PropertyMask = BitmaskFlags<u8>;

/// The projection the controller reads every cycle.
pub fn steering_fields() -> PropertyMask {
    PropertyMask::of(PropertyField::ALL)
}

/// Snapshot of an actor's state for one control cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorProperties {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub animation: Option<Animation>,
}

impl Default for ActorProperties {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            animation: None,
        }
    }
}

/// Partial write of actor properties. `None` fields are left untouched by the world.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyUpdate {
    pub position: Option<Vec3>,
    pub rotation: Option<Quat>,
    pub velocity: Option<Vec3>,
    pub angular_velocity: Option<Vec3>,
    pub animation: Option<Animation>,
}

impl PropertyUpdate {
    /// Build the commit for a finished cycle.
    ///
    /// Rotation is left to the physics integration of the world and the animation
    /// cursor to the host's animation system, so neither is written back.
    pub fn from_cycle(properties: &ActorProperties) -> Self {
        let animation = properties.animation.clone().map(|mut a| {
            a.current_frame = None;
            a
        });

        Self {
            position: Some(properties.position),
            rotation: None,
            velocity: Some(properties.velocity),
            angular_velocity: Some(properties.angular_velocity),
            animation,
        }
    }
}

/// Everything the world needs to create a pet entity.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorTemplate {
    /// Display name used in every log line about this pet.
    pub name: String,
    /// Full box extents of the body (not half extents).
    pub dimensions: Vec3,
    /// Initial properties; `Behavior::on_spawn` may adjust them before creation.
    pub properties: ActorProperties,
    /// Seconds before the world may reap the entity on its own, if any.
    pub lifetime: Option<f32>,
}

impl ActorTemplate {
    pub fn new(name: impl Into<String>, dimensions: Vec3) -> Self {
        Self {
            name: name.into(),
            dimensions,
            properties: ActorProperties::default(),
            lifetime: None,
        }
    }
}
