//! Ray-cast ground and obstacle sensing.
//!
//! Every query is a single ray cast into the world store that ignores the pet
//! itself and the entity it follows, so neither can count as ground or as an
//! obstacle.

use crate::{
    constants::{GROUND_SNAP_RADIUS, SURFACE_LIFT},
    error::WorldError,
    math,
    types::{ActorHandle, Vec3},
    world::{ProbeRay, RayHit, World},
};

/// Borrowed view of the world used for one control cycle.
pub struct GroundProbe<'a> {
    world: &'a dyn World,
    exclude: Vec<ActorHandle>,
}

impl<'a> GroundProbe<'a> {
    pub fn new(world: &'a dyn World, exclude: impl IntoIterator<Item = ActorHandle>) -> Self {
        Self {
            world,
            exclude: exclude.into_iter().collect(),
        }
    }

    fn nearest(&self, ray: &ProbeRay) -> Result<Option<RayHit>, WorldError> {
        self.world.cast_ray(ray, &self.exclude)
    }

    /// Snap a candidate destination onto the ground just below it.
    ///
    /// With a surface within [`GROUND_SNAP_RADIUS`] the result sits [`SURFACE_LIFT`]
    /// above the hit point; otherwise the candidate is lowered by the snap radius.
    pub fn resolve_grounded_target(&self, candidate: Vec3) -> Result<Vec3, WorldError> {
        let hit = self.nearest(&ProbeRay::down(candidate))?;
        let grounded = match hit {
            Some(hit) if hit.distance < GROUND_SNAP_RADIUS => {
                hit.point + Vec3::new(0.0, SURFACE_LIFT, 0.0)
            }
            _ => candidate - Vec3::new(0.0, GROUND_SNAP_RADIUS, 0.0),
        };
        Ok(grounded)
    }

    /// `true` unless there is ground closer than `distance` below `position`.
    pub fn is_airborne(&self, position: Vec3, distance: f32) -> Result<bool, WorldError> {
        let hit = self.nearest(&ProbeRay::down(position))?;
        Ok(!matches!(hit, Some(hit) if hit.distance < distance))
    }

    /// `false` only if an obstruction lies closer than `clearance` on the way from `from` to `to`.
    pub fn can_traverse(&self, from: Vec3, to: Vec3, clearance: f32) -> Result<bool, WorldError> {
        // A destination straight above or below has no facing; nothing to bump into sideways.
        let Some(facing) = math::look_at(&from, &to) else {
            return Ok(true);
        };
        let Some(ray) = ProbeRay::new(from, math::front(&facing)) else {
            return Ok(true);
        };
        let hit = self.nearest(&ray)?;
        Ok(!matches!(hit, Some(hit) if hit.distance < clearance))
    }
}
