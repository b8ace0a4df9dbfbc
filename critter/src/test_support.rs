//! In-memory collaborators for unit tests.
//!
//! `ScriptedWorld` answers ray queries analytically against horizontal floors,
//! walls across the Z axis and axis-aligned entity boxes, and records every
//! mutation so tests can assert on commits and deletions.

use std::{cell::RefCell, collections::BTreeMap};

use crate::{
    behavior::{Behavior, HookContext},
    error::{Fault, WorldError},
    target::Target,
    types::{
        ActorHandle, ActorProperties, ActorTemplate, Animation, PropertyMask, PropertyUpdate, Quat,
        Vec3,
    },
    world::{ProbeRay, RayHit, World},
};

struct BoxEntity {
    half_extents: Vec3,
    properties: ActorProperties,
}

#[derive(Default)]
pub struct ScriptedWorld {
    /// Heights of infinite horizontal floors.
    pub floors: Vec<f32>,
    /// Z coordinates of infinite walls facing along Z.
    pub walls_z: Vec<f32>,
    pub fail_rays: bool,
    pub hide_properties: bool,
    pub refuse_create: bool,
    pub created: Vec<ActorHandle>,
    pub deleted: Vec<ActorHandle>,
    pub commits: Vec<(ActorHandle, PropertyUpdate)>,
    entities: BTreeMap<ActorHandle, BoxEntity>,
    next_id: u64,
    excludes: RefCell<Vec<Vec<ActorHandle>>>,
}

impl ScriptedWorld {
    pub fn with_floor(height: f32) -> Self {
        Self {
            floors: vec![height],
            ..Default::default()
        }
    }

    pub fn add_wall_z(&mut self, z: f32) {
        self.walls_z.push(z);
    }

    /// Insert a box entity that is not a pet (an avatar, a crate).
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3) -> ActorHandle {
        let handle = self.allocate();
        self.entities.insert(
            handle,
            BoxEntity {
                half_extents,
                properties: ActorProperties {
                    position: center,
                    ..Default::default()
                },
            },
        );
        handle
    }

    pub fn reset_pose(&mut self, handle: ActorHandle, position: Vec3, rotation: Quat) {
        if let Some(entity) = self.entities.get_mut(&handle) {
            entity.properties.position = position;
            entity.properties.rotation = rotation;
        }
    }

    pub fn live_entities(&self) -> usize {
        self.entities.len()
    }

    /// Exclusion list of every ray cast so far.
    pub fn ray_excludes(&self) -> Vec<Vec<ActorHandle>> {
        self.excludes.borrow().clone()
    }

    fn allocate(&mut self) -> ActorHandle {
        self.next_id += 1;
        ActorHandle(self.next_id)
    }
}

fn ray_vs_box(ray: &ProbeRay, center: &Vec3, half: &Vec3) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let (o, d) = (ray.origin[axis], ray.direction[axis]);
        let (lo, hi) = (center[axis] - half[axis], center[axis] + half[axis]);
        if d.abs() < f32::EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let (a, b) = ((lo - o) / d, (hi - o) / d);
        t_enter = t_enter.max(a.min(b));
        t_exit = t_exit.min(a.max(b));
    }

    if t_exit < t_enter || t_exit < 0.0 {
        return None;
    }
    Some(t_enter.max(0.0))
}

fn ray_vs_plane(origin: f32, direction: f32, at: f32) -> Option<f32> {
    if direction.abs() < f32::EPSILON {
        return None;
    }
    let t = (at - origin) / direction;
    (t >= 0.0).then_some(t)
}

impl World for ScriptedWorld {
    fn create_entity(&mut self, template: &ActorTemplate) -> Result<ActorHandle, WorldError> {
        if self.refuse_create {
            return Err(WorldError::Unavailable("creation refused".into()));
        }
        let handle = self.allocate();
        self.entities.insert(
            handle,
            BoxEntity {
                half_extents: template.dimensions * 0.5,
                properties: template.properties.clone(),
            },
        );
        self.created.push(handle);
        Ok(handle)
    }

    fn delete_entity(&mut self, handle: ActorHandle) {
        self.entities.remove(&handle);
        self.deleted.push(handle);
    }

    fn get_properties(&self, handle: ActorHandle, _fields: PropertyMask) -> Option<ActorProperties> {
        if self.hide_properties {
            return None;
        }
        self.entities.get(&handle).map(|e| e.properties.clone())
    }

    fn set_properties(
        &mut self,
        handle: ActorHandle,
        update: PropertyUpdate,
    ) -> Result<(), WorldError> {
        let entity = self
            .entities
            .get_mut(&handle)
            .ok_or(WorldError::UnknownEntity(handle))?;
        let props = &mut entity.properties;
        if let Some(p) = update.position {
            props.position = p;
        }
        if let Some(r) = update.rotation {
            props.rotation = r;
        }
        if let Some(v) = update.velocity {
            props.velocity = v;
        }
        if let Some(w) = update.angular_velocity {
            props.angular_velocity = w;
        }
        if let Some(a) = update.animation.clone() {
            props.animation = Some(a);
        }
        self.commits.push((handle, update));
        Ok(())
    }

    fn cast_ray(
        &self,
        ray: &ProbeRay,
        exclude: &[ActorHandle],
    ) -> Result<Option<RayHit>, WorldError> {
        self.excludes.borrow_mut().push(exclude.to_vec());
        if self.fail_rays {
            return Err(WorldError::Unavailable("ray service down".into()));
        }

        let floors = self
            .floors
            .iter()
            .filter_map(|&h| ray_vs_plane(ray.origin.y, ray.direction.y, h));
        let walls = self
            .walls_z
            .iter()
            .filter_map(|&z| ray_vs_plane(ray.origin.z, ray.direction.z, z));
        let boxes = self
            .entities
            .iter()
            .filter(|(handle, _)| !exclude.contains(handle))
            .filter_map(|(_, e)| ray_vs_box(ray, &e.properties.position, &e.half_extents));

        let nearest = floors
            .chain(walls)
            .chain(boxes)
            .min_by(|a, b| a.total_cmp(b));

        Ok(nearest.map(|distance| RayHit {
            distance,
            point: ray.point_at(distance),
        }))
    }
}

/// Behavior that follows a fixed point and optionally scripts hook side effects.
#[derive(Default)]
pub struct FollowPoint {
    pub point: Vec3,
    pub handle: Option<ActorHandle>,
    /// Destination offset installed by every `apply_behavior` call.
    pub next_offset: Option<Vec3>,
    /// Animation url set on every cycle.
    pub animation: Option<String>,
    /// Position forced onto new pets by `on_spawn`.
    pub spawn_at: Option<Vec3>,
    pub fail_select: bool,
    pub spawns: usize,
    pub selects: usize,
    pub applies: usize,
}

impl FollowPoint {
    pub fn new(point: Vec3) -> Self {
        Self {
            point,
            ..Default::default()
        }
    }
}

impl Behavior for FollowPoint {
    fn on_spawn(&mut self, properties: &mut ActorProperties) {
        self.spawns += 1;
        if let Some(p) = self.spawn_at {
            properties.position = p;
        }
    }

    fn select_target(
        &mut self,
        _properties: &ActorProperties,
        _ctx: &mut HookContext<'_>,
    ) -> Result<Target, Fault> {
        self.selects += 1;
        if self.fail_select {
            return Err(Fault::Hook("no target".into()));
        }
        let mut target = Target::at(self.point);
        target.handle = self.handle;
        Ok(target)
    }

    fn apply_behavior(
        &mut self,
        properties: &mut ActorProperties,
        ctx: &mut HookContext<'_>,
    ) -> Result<(), Fault> {
        self.applies += 1;
        if let Some(offset) = self.next_offset {
            *ctx.destination_offset = offset;
        }
        if let Some(url) = &self.animation {
            let mut anim = Animation::new(url.clone());
            anim.current_frame = Some(3.0);
            properties.animation = Some(anim);
        }
        Ok(())
    }
}
