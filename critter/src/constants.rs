/*!
Fixed steering and probing constants.

These are the tuning values of the control law that are not exposed as
per-pet rules. Keeping them together makes it easy to see every magic number
the controller reacts to.

Notes
- Distances are in world units (meters), time in seconds.
- Rotation errors are measured in degrees before the steering gain is applied.
*/

/// How far below a candidate destination the ground probe looks for a surface.
/// Without a hit the destination is lowered by this much instead.
pub const GROUND_SNAP_RADIUS: f32 = 1.2;

/// Lift applied above a snapped ground hit so the destination sits on the surface.
pub const SURFACE_LIFT: f32 = 0.125;

/// Inside this distance of the destination the pet neither moves nor turns.
pub const ARRIVAL_DEAD_ZONE: f32 = 0.6;

/// Speed law: `SPEED_GAIN * distance / (keep_within_distance / SPEED_SPAN_DIVISOR)`.
pub const SPEED_GAIN: f32 = 20.0;
pub const SPEED_SPAN_DIVISOR: f32 = 5.0;

/// Proportional gain from rotation error (degrees) to angular velocity.
pub const STEERING_GAIN: f32 = 0.12;

/// Tilt from world-up beyond which the pet is considered tipped over (degrees).
pub const MAX_TILT_DEGREES: f32 = 55.0;

/// Seconds of accumulated loss of control that force a reload.
pub const RUNAWAY_LIMIT_S: f32 = 0.8;

/// Flight mode doubles horizontal speed.
pub const FLIGHT_SPEED_MULTIPLIER: f32 = 2.0;

/// Gain of the proportional height tracking used in flight mode.
pub const FLIGHT_HEIGHT_GAIN: f32 = 20.0;

/// Grounded pets get this fraction of gravity to stay glued to the floor.
pub const GROUNDED_GRAVITY_FRACTION: f32 = 1.0 / 8.0;

/// Upward nudge applied when the forward path is blocked, in body heights.
pub const OBSTACLE_HOP_HEIGHTS: f32 = 2.0;

/// Forward probes start this fraction of a body height below the pet's center.
pub const FORWARD_PROBE_DROP: f32 = 0.1;

/// Obstacles closer than this along the forward probe block the path.
pub const DEFAULT_TRAVERSE_CLEARANCE: f32 = 0.5;

/// A target with no ground within this distance below it counts as airborne.
pub const TARGET_AIRBORNE_DISTANCE: f32 = 2.0;

/// A target faster than this (units per second) counts as moving.
pub const TARGET_MOVING_SPEED: f32 = 0.2;

/// Below the velocity threshold, turning faster than this (rad/s) is reported as slow movement.
pub const TURN_IN_PLACE_RATE: f32 = 0.2;

/// Farthest distance any probe ray is traced.
pub const MAX_RAY_DISTANCE: f32 = 1.0e4;

/// Practical small length for degenerate direction checks.
pub const DIST_EPS: f32 = 1.0e-6;
