pub mod behavior;
pub mod bitmask_flags;
pub mod constants;
pub mod controller;
pub mod error;
pub mod lifecycle;
pub mod math;
pub mod motion_state;
pub mod overlay;
pub mod probe;
pub mod rapier_world;
pub mod rules;
pub mod safeguard;
pub mod scheduler;
pub mod target;
pub mod timers;
pub mod types;
pub mod world;

#[cfg(test)]
mod test_support;

pub use behavior::{Behavior, HookContext};
pub use controller::{Controller, CycleReport, TickOutcome};
pub use error::{ConfigurationError, Fault, FaultKind, WorldError};
pub use lifecycle::{Critter, HostContext, TickResult};
pub use motion_state::{Locomotion, MotionFlag, MotionState, Vertical};
pub use overlay::{DebugOverlays, LineGeometry, NoOverlays, VisualHandle};
pub use rapier_world::{ColliderShapeDef, RapierWorld, WorldStaticDef};
pub use rules::{Rules, RulesOverrides};
pub use scheduler::{FrameScheduler, Scheduler, Signal, Subscription};
pub use target::{Followable, Target};
pub use types::{ActorHandle, ActorProperties, ActorTemplate, Animation, Quat, Vec3};
pub use world::{ProbeRay, RayHit, World};
