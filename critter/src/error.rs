use thiserror::Error;

use crate::types::ActorHandle;

/// Failure reported by a world store collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("{0} does not exist in the world")]
    UnknownEntity(ActorHandle),
    #[error("world query unavailable: {0}")]
    Unavailable(String),
}

/// Errors that prevent a pet from being constructed at all.
///
/// These surface to the caller of spawn and are never handled by reloading.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("no actor template was supplied")]
    MissingTemplate,
    #[error("rule `{field}` has invalid value {value}")]
    InvalidRule { field: &'static str, value: f32 },
    #[error("world refused to create the actor: {0}")]
    Spawn(#[from] WorldError),
}

/// Why a control cycle gave up. Every fault is recovered by reloading the pet.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Fault {
    #[error("target unreachable at distance {distance:.2} (limit {limit:.2})")]
    TargetUnreachable { distance: f32, limit: f32 },
    #[error("lost control for {seconds:.2}s")]
    ControlLoss { seconds: f32 },
    #[error("tipped over by {tilt_degrees:.1} degrees")]
    Orientation { tilt_degrees: f32 },
    #[error("{0} has no properties")]
    QueryUnavailable(ActorHandle),
    #[error(transparent)]
    Transient(#[from] WorldError),
    #[error("behavior hook failed: {0}")]
    Hook(String),
}

/// Fieldless discriminant of a [`Fault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    TargetUnreachable,
    ControlLoss,
    Orientation,
    QueryUnavailable,
    Transient,
}

impl Fault {
    pub fn kind(&self) -> FaultKind {
        match self {
            Fault::TargetUnreachable { .. } => FaultKind::TargetUnreachable,
            Fault::ControlLoss { .. } => FaultKind::ControlLoss,
            Fault::Orientation { .. } => FaultKind::Orientation,
            Fault::QueryUnavailable(_) => FaultKind::QueryUnavailable,
            Fault::Transient(_) | Fault::Hook(_) => FaultKind::Transient,
        }
    }
}
