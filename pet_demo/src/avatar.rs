//! A scripted avatar walking a circle around the origin.

use anyhow::Result;
use critter::{
    ActorHandle, ActorTemplate, Followable, Quat, Vec3, World, math, types::PropertyUpdate,
};

const AVATAR_HEIGHT: f32 = 1.8;

pub struct WalkingAvatar {
    handle: ActorHandle,
    radius: f32,
    /// Radians per second around the circle.
    pace: f32,
    elapsed: f32,
    position: Vec3,
    velocity: Vec3,
    rotation: Quat,
}

impl WalkingAvatar {
    pub fn spawn(world: &mut dyn World, radius: f32, pace: f32) -> Result<Self> {
        let position = Self::point_on_circle(radius, 0.0);
        let mut template = ActorTemplate::new("Avatar", Vec3::new(0.6, AVATAR_HEIGHT, 0.6));
        template.properties.position = position;
        let handle = world.create_entity(&template)?;

        Ok(Self {
            handle,
            radius,
            pace,
            elapsed: 0.0,
            position,
            velocity: Vec3::zeros(),
            rotation: Quat::identity(),
        })
    }

    fn point_on_circle(radius: f32, angle: f32) -> Vec3 {
        Vec3::new(radius * angle.cos(), AVATAR_HEIGHT * 0.5, radius * angle.sin())
    }

    /// Walk for `dt` seconds and push the new pose to the world.
    pub fn walk(&mut self, world: &mut dyn World, dt: f32) -> Result<()> {
        self.elapsed += dt;
        let next = Self::point_on_circle(self.radius, self.elapsed * self.pace);
        if dt > 0.0 {
            self.velocity = (next - self.position) / dt;
        }
        if let Some(facing) = math::look_at(&self.position, &next) {
            self.rotation = facing;
        }
        self.position = next;

        world.set_properties(
            self.handle,
            PropertyUpdate {
                position: Some(self.position),
                rotation: Some(self.rotation),
                velocity: Some(self.velocity),
                ..Default::default()
            },
        )?;
        Ok(())
    }
}

impl Followable for WalkingAvatar {
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
        Some(self.handle)
    }
}
