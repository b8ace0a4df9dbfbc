//! The steering controller: one pet's fixed-rate control loop.
//!
//! Each frame delta feeds a throttle accumulator. Once a full tick interval
//! has built up, a control cycle runs:
//! - read the pet's properties and ask the behavior what to follow
//! - snap the destination (target + offset) to the ground
//! - derive speed from distance and a yaw-only turn from the facing error
//! - pick flight or ground locomotion from ray probes
//! - classify motion, let the behavior adjust, commit to the world
//!
//! Any condition the loop cannot correct locally is returned as a [`Fault`];
//! the owner answers every fault by respawning the pet.

use log::debug;

use crate::{
    behavior::{Behavior, HookContext},
    constants::{
        ARRIVAL_DEAD_ZONE, DEFAULT_TRAVERSE_CLEARANCE, FLIGHT_HEIGHT_GAIN, FLIGHT_SPEED_MULTIPLIER,
        FORWARD_PROBE_DROP, GROUNDED_GRAVITY_FRACTION, MAX_TILT_DEGREES, OBSTACLE_HOP_HEIGHTS,
        SPEED_GAIN, SPEED_SPAN_DIVISOR, STEERING_GAIN, TARGET_AIRBORNE_DISTANCE,
    },
    error::{Fault, WorldError},
    math,
    motion_state::{self, MotionSample, MotionState},
    probe::GroundProbe,
    rules::Rules,
    safeguard::ControlSafeguard,
    target::Target,
    timers::CustomTimers,
    types::{ActorHandle, ActorProperties, PropertyUpdate, Vec3, steering_fields},
    world::World,
};

/// Result of feeding one frame delta to the controller.
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// Not enough time has accumulated for a control cycle.
    Throttled,
    /// A control cycle ran and its properties were committed.
    Committed(CycleReport),
}

/// What one control cycle decided.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleReport {
    /// Seconds covered by the cycle (the accumulated throttle).
    pub dt: f32,
    /// Ground-snapped point the pet steered toward.
    pub destination: Vec3,
    pub distance: f32,
    pub speed: f32,
    /// Rotation correction in degrees, after the dead zone and with pitch/roll removed.
    pub angles: Vec3,
    /// Properties as committed (after the behavior hook).
    pub properties: ActorProperties,
    pub state: MotionState,
    pub safeguard_seconds: f32,
}

pub struct Controller {
    name: String,
    rules: Rules,
    handle: ActorHandle,
    dimensions: Vec3,
    throttle: f32,
    safeguard: ControlSafeguard,
    destination_offset: Vec3,
    state: MotionState,
    timers: CustomTimers,
    target: Option<Target>,
}

impl Controller {
    /// Fresh controller for a newly created entity.
    ///
    /// The throttle starts full so the first frame after a spawn runs a cycle.
    pub fn new<S: AsRef<str>>(
        name: impl Into<String>,
        rules: Rules,
        handle: ActorHandle,
        dimensions: Vec3,
        timer_names: &[S],
    ) -> Self {
        Self {
            name: name.into(),
            rules,
            handle,
            dimensions,
            throttle: rules.tick_interval,
            safeguard: ControlSafeguard::default(),
            destination_offset: Vec3::zeros(),
            state: MotionState::default(),
            timers: CustomTimers::new(timer_names),
            target: None,
        }
    }

    pub fn handle(&self) -> ActorHandle {
        self.handle
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn safeguard(&self) -> &ControlSafeguard {
        &self.safeguard
    }

    pub fn timers(&self) -> &CustomTimers {
        &self.timers
    }

    pub fn destination_offset(&self) -> Vec3 {
        self.destination_offset
    }

    pub fn set_destination_offset(&mut self, offset: Vec3) {
        self.destination_offset = offset;
    }

    /// Target of the last committed cycle.
    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// Feed one frame delta. Runs a control cycle once a tick interval has accumulated.
    pub fn on_tick(
        &mut self,
        world: &mut dyn World,
        behavior: &mut dyn Behavior,
        dt: f32,
    ) -> Result<TickOutcome, Fault> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.throttle += dt;
        self.timers.advance(dt);

        if self.throttle < self.rules.tick_interval {
            return Ok(TickOutcome::Throttled);
        }

        let result = self.control_cycle(world, behavior);
        self.throttle = 0.0;
        result.map(TickOutcome::Committed)
    }

    fn control_cycle(
        &mut self,
        world: &mut dyn World,
        behavior: &mut dyn Behavior,
    ) -> Result<CycleReport, Fault> {
        let dt = self.throttle;
        let rules = self.rules;

        let mut properties = world
            .get_properties(self.handle, steering_fields())
            .ok_or(Fault::QueryUnavailable(self.handle))?;

        let target = behavior.select_target(
            &properties,
            &mut HookContext {
                world: &*world,
                destination_offset: &mut self.destination_offset,
                timers: &mut self.timers,
                state: self.state,
                target: self.target.as_ref(),
                dt,
            },
        )?;

        let probe = GroundProbe::new(&*world, [Some(self.handle), target.handle].into_iter().flatten());
        let destination = probe.resolve_grounded_target(target.position + self.destination_offset)?;
        let distance = (properties.position - destination).norm();

        if distance > rules.max_distance {
            let limit = 2.0 * rules.max_distance;
            if distance > limit {
                return Err(Fault::TargetUnreachable { distance, limit });
            }
            if rules.debug_enabled {
                debug!("{}: too far from destination ({distance:.2})", self.name);
            }
            self.safeguard.penalize(dt);
        }

        let mut speed = SPEED_GAIN * distance / (rules.keep_within_distance / SPEED_SPAN_DIVISOR);
        let mut angles = math::look_at(&properties.position, &destination)
            .map(|look| math::safe_euler_angles(&(properties.rotation.inverse() * look)))
            .unwrap_or_else(Vec3::zeros);

        if distance < ARRIVAL_DEAD_ZONE {
            speed = 0.0;
            angles = Vec3::zeros();
        }
        // Facing only corrects yaw.
        angles.x = 0.0;
        angles.z = 0.0;

        let tilt_degrees = math::tilt_degrees(&properties.rotation);
        if tilt_degrees > MAX_TILT_DEGREES {
            return Err(Fault::Orientation { tilt_degrees });
        }

        let mut angular_velocity = angles * STEERING_GAIN;
        angular_velocity.y = angular_velocity
            .y
            .clamp(-rules.max_turn_rate, rules.max_turn_rate);

        self.safeguard
            .record_spin(angular_velocity.norm(), rules.max_turn_rate, dt);
        if let Some(seconds) = self.safeguard.trip() {
            return Err(Fault::ControlLoss { seconds });
        }

        let mut velocity = math::front(&properties.rotation) * speed * dt;
        let flying = self.select_locomotion(
            &probe,
            &properties.position,
            &target,
            &destination,
            dt,
            &mut velocity,
        )?;

        properties.velocity = velocity;
        properties.angular_velocity = angular_velocity;
        self.state = motion_state::classify(
            &MotionSample {
                velocity,
                angular_velocity,
                flying,
            },
            &rules,
        );

        behavior.apply_behavior(
            &mut properties,
            &mut HookContext {
                world: &*world,
                destination_offset: &mut self.destination_offset,
                timers: &mut self.timers,
                state: self.state,
                target: Some(&target),
                dt,
            },
        )?;

        if rules.debug_enabled {
            debug!(
                "{}: distance {distance:.2} speed {speed:.2} yaw {:.1} state {:#08b} safeguard {:.2}",
                self.name,
                angles.y,
                self.state.bits(),
                self.safeguard.seconds()
            );
        }

        world.set_properties(self.handle, PropertyUpdate::from_cycle(&properties))?;
        self.target = Some(target);

        Ok(CycleReport {
            dt,
            destination,
            distance,
            speed,
            angles,
            properties,
            state: self.state,
            safeguard_seconds: self.safeguard.seconds(),
        })
    }

    /// Choose flight or ground locomotion and adjust the vertical velocity for it.
    ///
    /// Returns whether the pet is flying this cycle.
    fn select_locomotion(
        &self,
        probe: &GroundProbe<'_>,
        position: &Vec3,
        target: &Target,
        destination: &Vec3,
        dt: f32,
        velocity: &mut Vec3,
    ) -> Result<bool, WorldError> {
        let rules = &self.rules;
        let flying = rules.always_flying
            || probe.is_airborne(target.position, TARGET_AIRBORNE_DISTANCE)?
            || probe.is_airborne(*position, rules.flight_distance)?;

        if flying {
            *velocity *= FLIGHT_SPEED_MULTIPLIER;
            velocity.y = (destination.y - position.y) * dt * FLIGHT_HEIGHT_GAIN;
            return Ok(true);
        }

        let body = self.dimensions.y;
        let from = position - Vec3::new(0.0, body * FORWARD_PROBE_DROP, 0.0);
        if !probe.can_traverse(from, *destination, DEFAULT_TRAVERSE_CLEARANCE)? {
            // TODO: cap or decay the hop; repeated blocked cycles keep adding to it.
            velocity.y += body * OBSTACLE_HOP_HEIGHTS;
            return Ok(false);
        }

        if probe.is_airborne(*position, body)? {
            velocity.y = rules.gravity * dt;
            return probe.is_airborne(*position, body * 2.0);
        }

        velocity.y = rules.gravity * GROUNDED_GRAVITY_FRACTION * dt;
        Ok(false)
    }
}
