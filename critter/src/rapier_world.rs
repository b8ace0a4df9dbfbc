//! Rapier-backed world store.
//!
//! Static geometry is built once from [`WorldStaticDef`]s into Rapier sets and
//! queried through a borrowed `QueryPipeline`. Actors live beside it as
//! oriented boxes keyed by handle; rays are tested against them with parry so
//! that excluded handles can be skipped without touching the static scene.
//!
//! There is no dynamics solver. [`RapierWorld::step`] integrates each actor's
//! velocity and angular velocity kinematically.

use std::collections::BTreeMap;

use log::debug;
use rapier3d::{
    na::{Translation3, UnitQuaternion},
    parry::{query::RayCast, shape::Cuboid},
    prelude::*,
};

use crate::{
    constants::MAX_RAY_DISTANCE,
    error::WorldError,
    types::{ActorHandle, ActorProperties, ActorTemplate, PropertyMask, PropertyUpdate, Vec3},
    world::{ProbeRay, RayHit, World},
};

/// Definition of an immutable scene collider.
///
/// Units are meters. Statics are inserted sorted by `id`.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    pub id: u32,
    pub translation: Vec3,
    pub rotation: UnitQuaternion<f32>,
    pub shape: ColliderShapeDef,
}

impl WorldStaticDef {
    /// Horizontal ground plane at height `y`.
    pub fn floor(id: u32, y: f32) -> Self {
        Self {
            id,
            translation: Vec3::new(0.0, y, 0.0),
            rotation: UnitQuaternion::identity(),
            shape: ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
        }
    }

    /// Axis-aligned box centered on `center`.
    pub fn block(id: u32, center: Vec3, half_extents: Vec3) -> Self {
        Self {
            id,
            translation: center,
            rotation: UnitQuaternion::identity(),
            shape: ColliderShapeDef::Cuboid { half_extents },
        }
    }
}

#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite half-space whose outward normal is `rotation * +Y`.
    Plane { offset_along_normal: f32 },
    Cuboid { half_extents: Vec3 },
}

/// Collider in the local frame of its fixed parent body.
fn collider_from_def(def: &WorldStaticDef) -> Collider {
    match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => ColliderBuilder::halfspace(Vector::y_axis())
            .translation(Vector::y() * *offset_along_normal)
            .build(),
        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build()
        }
    }
}

struct Statics {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
}

impl Statics {
    fn build(mut defs: Vec<WorldStaticDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        for def in &defs {
            let iso = Isometry::from_parts(Translation3::from(def.translation), def.rotation);
            let body = bodies.insert(RigidBodyBuilder::fixed().pose(iso).build());
            colliders.insert_with_parent(collider_from_def(def), body, &mut bodies);
        }

        // Collision detection only, to populate the broad-phase BVH.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        CollisionPipeline::new().step(
            0.0,
            &mut broad_phase,
            &mut narrow_phase,
            &mut bodies,
            &mut colliders,
            &(),
            &(),
        );

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase,
        }
    }

    fn query_pipeline(&self) -> QueryPipeline<'_> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            QueryFilter::default(),
        )
    }
}

struct Actor {
    half_extents: Vec3,
    properties: ActorProperties,
    /// Seconds left before the entity is reaped.
    remaining: Option<f32>,
}

impl Actor {
    fn iso(&self) -> Isometry<f32> {
        Isometry::from_parts(
            Translation3::from(self.properties.position),
            self.properties.rotation,
        )
    }
}

/// In-memory world: an immutable static scene plus kinematic box actors.
pub struct RapierWorld {
    statics: Statics,
    actors: BTreeMap<ActorHandle, Actor>,
    next_id: u64,
}

impl RapierWorld {
    pub fn new(defs: Vec<WorldStaticDef>) -> Self {
        Self {
            statics: Statics::build(defs),
            actors: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Advance every actor by `dt` seconds and reap those whose lifetime ran out.
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        for actor in self.actors.values_mut() {
            let props = &mut actor.properties;
            props.position += props.velocity * dt;
            props.rotation = UnitQuaternion::from_scaled_axis(props.angular_velocity * dt)
                * props.rotation;
            if let Some(remaining) = actor.remaining.as_mut() {
                *remaining -= dt;
            }
        }

        self.actors.retain(|handle, actor| {
            let alive = actor.remaining.is_none_or(|r| r > 0.0);
            if !alive {
                debug!("{handle} expired");
            }
            alive
        });
    }

    fn nearest_static(&self, ray: &Ray) -> Option<f32> {
        self.statics
            .query_pipeline()
            .cast_ray(ray, MAX_RAY_DISTANCE, true)
            .map(|(_, toi)| toi)
    }

    fn nearest_actor(&self, ray: &Ray, exclude: &[ActorHandle]) -> Option<f32> {
        self.actors
            .iter()
            .filter(|(handle, _)| !exclude.contains(handle))
            .filter_map(|(_, actor)| {
                Cuboid::new(actor.half_extents).cast_ray(&actor.iso(), ray, MAX_RAY_DISTANCE, true)
            })
            .min_by(|a, b| a.total_cmp(b))
    }
}

impl World for RapierWorld {
    fn create_entity(&mut self, template: &ActorTemplate) -> Result<ActorHandle, WorldError> {
        let half_extents = template.dimensions * 0.5;
        if half_extents.iter().any(|h| !h.is_finite() || *h <= 0.0) {
            return Err(WorldError::Unavailable(format!(
                "invalid dimensions for {}",
                template.name
            )));
        }

        self.next_id += 1;
        let handle = ActorHandle(self.next_id);
        self.actors.insert(
            handle,
            Actor {
                half_extents,
                properties: template.properties.clone(),
                remaining: template.lifetime,
            },
        );
        Ok(handle)
    }

    fn delete_entity(&mut self, handle: ActorHandle) {
        self.actors.remove(&handle);
    }

    fn get_properties(&self, handle: ActorHandle, _fields: PropertyMask) -> Option<ActorProperties> {
        self.actors.get(&handle).map(|a| a.properties.clone())
    }

    fn set_properties(
        &mut self,
        handle: ActorHandle,
        update: PropertyUpdate,
    ) -> Result<(), WorldError> {
        let actor = self
            .actors
            .get_mut(&handle)
            .ok_or(WorldError::UnknownEntity(handle))?;
        let props = &mut actor.properties;
        if let Some(position) = update.position {
            props.position = position;
        }
        if let Some(rotation) = update.rotation {
            props.rotation = rotation;
        }
        if let Some(velocity) = update.velocity {
            props.velocity = velocity;
        }
        if let Some(angular_velocity) = update.angular_velocity {
            props.angular_velocity = angular_velocity;
        }
        if let Some(mut animation) = update.animation {
            // Keep the playback cursor when the same clip is re-sent.
            if let Some(current) = &props.animation
                && current.url == animation.url
            {
                animation.current_frame = current.current_frame;
            }
            props.animation = Some(animation);
        }
        Ok(())
    }

    fn cast_ray(
        &self,
        probe: &ProbeRay,
        exclude: &[ActorHandle],
    ) -> Result<Option<RayHit>, WorldError> {
        let ray = Ray::new(Point::from(probe.origin), probe.direction);
        let nearest = match (self.nearest_static(&ray), self.nearest_actor(&ray, exclude)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        Ok(nearest.map(|distance| RayHit {
            distance,
            point: probe.point_at(distance),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Quat, steering_fields};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1.0e-4
    }

    fn pet_at(position: Vec3) -> ActorTemplate {
        let mut template = ActorTemplate::new("pet", Vec3::new(1.0, 1.0, 1.0));
        template.properties.position = position;
        template
    }

    #[test]
    fn ray_hits_floor_plane() {
        let world = RapierWorld::new(vec![WorldStaticDef::floor(1, 0.0)]);

        let hit = world
            .cast_ray(&ProbeRay::down(Vec3::new(3.0, 2.5, -1.0)), &[])
            .unwrap()
            .expect("floor below");

        assert!(approx(hit.distance, 2.5));
        assert!(approx(hit.point.y, 0.0));
    }

    #[test]
    fn nearest_of_statics_wins() {
        let world = RapierWorld::new(vec![
            WorldStaticDef::floor(1, 0.0),
            WorldStaticDef::block(2, Vec3::new(0.0, 0.5, 0.0), Vec3::new(1.0, 0.5, 1.0)),
        ]);

        let hit = world
            .cast_ray(&ProbeRay::down(Vec3::new(0.0, 3.0, 0.0)), &[])
            .unwrap()
            .unwrap();

        assert!(approx(hit.distance, 2.0));
    }

    #[test]
    fn empty_scene_has_no_hits() {
        let world = RapierWorld::new(Vec::new());
        let hit = world.cast_ray(&ProbeRay::down(Vec3::zeros()), &[]).unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn actors_block_rays_unless_excluded() {
        let mut world = RapierWorld::new(vec![WorldStaticDef::floor(1, -10.0)]);
        let pet = world.create_entity(&pet_at(Vec3::new(0.0, 0.0, 0.0))).unwrap();
        let ray = ProbeRay::down(Vec3::new(0.0, 2.0, 0.0));

        let seen = world.cast_ray(&ray, &[]).unwrap().unwrap();
        let blind = world.cast_ray(&ray, &[pet]).unwrap().unwrap();

        assert!(approx(seen.distance, 1.5));
        assert!(approx(blind.distance, 12.0));
    }

    #[test]
    fn step_integrates_velocity() {
        let mut world = RapierWorld::new(Vec::new());
        let pet = world.create_entity(&pet_at(Vec3::zeros())).unwrap();
        world
            .set_properties(
                pet,
                PropertyUpdate {
                    velocity: Some(Vec3::new(0.0, 0.0, -2.0)),
                    angular_velocity: Some(Vec3::new(0.0, 1.0, 0.0)),
                    ..Default::default()
                },
            )
            .unwrap();

        world.step(0.5);

        let props = world.get_properties(pet, steering_fields()).unwrap();
        assert!(approx(props.position.z, -1.0));
        assert!(approx(props.rotation.angle(), 0.5));
    }

    #[test]
    fn commits_to_missing_entities_fail() {
        let mut world = RapierWorld::new(Vec::new());
        let err = world
            .set_properties(ActorHandle(42), PropertyUpdate::default())
            .unwrap_err();
        assert_eq!(err, WorldError::UnknownEntity(ActorHandle(42)));
    }

    #[test]
    fn deleted_entities_have_no_properties() {
        let mut world = RapierWorld::new(Vec::new());
        let pet = world.create_entity(&pet_at(Vec3::zeros())).unwrap();
        world.delete_entity(pet);

        assert!(world.get_properties(pet, steering_fields()).is_none());
        assert_eq!(world.actor_count(), 0);
    }

    #[test]
    fn lifetime_reaps_entities() {
        let mut world = RapierWorld::new(Vec::new());
        let mut template = pet_at(Vec3::zeros());
        template.lifetime = Some(1.0);
        let short = world.create_entity(&template).unwrap();
        let long = world.create_entity(&pet_at(Vec3::zeros())).unwrap();

        world.step(0.6);
        assert!(world.get_properties(short, steering_fields()).is_some());
        world.step(0.6);

        assert!(world.get_properties(short, steering_fields()).is_none());
        assert!(world.get_properties(long, steering_fields()).is_some());
        assert_eq!(world.actor_count(), 1);
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        let mut world = RapierWorld::new(Vec::new());
        let template = ActorTemplate::new("flat", Vec3::new(1.0, 0.0, 1.0));
        assert!(world.create_entity(&template).is_err());
    }

    #[test]
    fn rotated_block_is_oriented() {
        let mut world = RapierWorld::new(Vec::new());
        let mut template = ActorTemplate::new("plank", Vec3::new(4.0, 0.2, 0.2));
        template.properties.rotation = Quat::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_2);
        world.create_entity(&template).unwrap();

        // Standing upright, the plank's top is 2 above its center.
        let hit = world
            .cast_ray(&ProbeRay::down(Vec3::new(0.0, 5.0, 0.0)), &[])
            .unwrap()
            .unwrap();
        assert!(approx(hit.distance, 3.0));
    }
}
