//! Customization hooks implemented by each concrete pet.

use crate::{
    error::Fault,
    motion_state::MotionState,
    target::Target,
    timers::CustomTimers,
    types::{ActorProperties, Vec3},
    world::World,
};

/// Pet state a hook may read or adjust while the controller is paused on it.
pub struct HookContext<'a> {
    /// Read access to the world, e.g. to look up the entity to follow.
    pub world: &'a dyn World,
    /// Offset from the target the pet steers toward. Persists across cycles.
    pub destination_offset: &'a mut Vec3,
    pub timers: &'a mut CustomTimers,
    /// Motion state of the current cycle (of the previous one inside `select_target`).
    pub state: MotionState,
    /// Target of the current cycle (of the previous one inside `select_target`).
    pub target: Option<&'a Target>,
    /// Seconds covered by this control cycle.
    pub dt: f32,
}

/// Behavior of one kind of pet.
///
/// Hooks run synchronously inside a control cycle. Returning an error aborts
/// the cycle and respawns the pet.
pub trait Behavior {
    /// Adjust the template's initial properties before the entity is created.
    fn on_spawn(&mut self, properties: &mut ActorProperties) {
        let _ = properties;
    }

    /// Pick what to follow this cycle.
    fn select_target(
        &mut self,
        properties: &ActorProperties,
        ctx: &mut HookContext<'_>,
    ) -> Result<Target, Fault>;

    /// Final say over the cycle's properties before they are committed.
    ///
    /// Mutate `properties` in place: set an animation, override the velocity, or
    /// move the destination offset for the next cycle.
    fn apply_behavior(
        &mut self,
        properties: &mut ActorProperties,
        ctx: &mut HookContext<'_>,
    ) -> Result<(), Fault> {
        let _ = (properties, ctx);
        Ok(())
    }
}
