//! A pet that hovers above the avatar.

use critter::{
    ActorHandle, ActorProperties, Animation, Behavior, Fault, HookContext, Target, Vec3,
    types::steering_fields,
};
use log::info;

/// Seconds between two "custom" timer announcements.
const CHIRP_INTERVAL: f32 = 5.0;

pub struct HoveringPet {
    avatar: ActorHandle,
    /// Where the avatar was on the last frame; new pets appear there.
    pub home: Target,
}

impl HoveringPet {
    pub fn new(avatar: ActorHandle, home: Target) -> Self {
        Self { avatar, home }
    }
}

impl Behavior for HoveringPet {
    fn on_spawn(&mut self, properties: &mut ActorProperties) {
        properties.position = self.home.position;
        properties.rotation = self.home.rotation;
    }

    fn select_target(
        &mut self,
        _properties: &ActorProperties,
        ctx: &mut HookContext<'_>,
    ) -> Result<Target, Fault> {
        let avatar = ctx
            .world
            .get_properties(self.avatar, steering_fields())
            .ok_or_else(|| Fault::Hook(format!("{} is gone", self.avatar)))?;

        Ok(Target {
            position: avatar.position,
            rotation: avatar.rotation,
            velocity: avatar.velocity,
            handle: Some(self.avatar),
        })
    }

    fn apply_behavior(
        &mut self,
        properties: &mut ActorProperties,
        ctx: &mut HookContext<'_>,
    ) -> Result<(), Fault> {
        *ctx.destination_offset = Vec3::new(0.0, 3.0, 0.0);

        let clip = if ctx.state.is_flying() && ctx.state.is_moving() {
            "fly"
        } else if ctx.state.is_flying() {
            "hover"
        } else if ctx.state.is_moving() {
            "walk"
        } else {
            "idle"
        };
        if properties.animation.as_ref().map(|a| a.url.as_str()) != Some(clip) {
            properties.animation = Some(Animation::new(clip));
        }

        if ctx.timers.get("custom").is_some_and(|t| t > CHIRP_INTERVAL) {
            let following = ctx.target.is_some_and(Target::is_moving);
            info!("chirp (avatar moving: {following})");
            ctx.timers.reset("custom");
        }
        Ok(())
    }
}
