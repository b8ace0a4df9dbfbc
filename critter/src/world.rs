//! The world/entity store the controller reads from and commits to.
//!
//! The store owns actor transforms and answers ray queries. The controller only
//! ever borrows it for the duration of one call.

use crate::{
    error::WorldError,
    types::{ActorHandle, ActorProperties, ActorTemplate, PropertyMask, PropertyUpdate, Vec3},
};

/// A ray with a unit-length direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl ProbeRay {
    /// Build a ray, normalizing `direction`. Returns `None` for a zero direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize(f32::EPSILON)?;
        Some(Self { origin, direction })
    }

    pub fn down(origin: Vec3) -> Self {
        Self {
            origin,
            direction: Vec3::new(0.0, -1.0, 0.0),
        }
    }

    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Nearest intersection along a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec3,
}

pub trait World {
    fn create_entity(&mut self, template: &ActorTemplate) -> Result<ActorHandle, WorldError>;

    fn delete_entity(&mut self, handle: ActorHandle);

    /// Current properties of `handle`, or `None` if the entity is gone.
    ///
    /// Fields outside `fields` may be left at their defaults.
    fn get_properties(&self, handle: ActorHandle, fields: PropertyMask) -> Option<ActorProperties>;

    fn set_properties(
        &mut self,
        handle: ActorHandle,
        update: PropertyUpdate,
    ) -> Result<(), WorldError>;

    /// Nearest hit along `ray`, ignoring the entities in `exclude`.
    fn cast_ray(&self, ray: &ProbeRay, exclude: &[ActorHandle])
    -> Result<Option<RayHit>, WorldError>;
}
