//! Optional debug visuals.

use crate::types::Vec3;

/// Opaque handle of a debug visual owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VisualHandle(pub u64);

/// A line segment in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineGeometry {
    pub start: Vec3,
    pub end: Vec3,
}

impl LineGeometry {
    /// Segment from `position` to `position + velocity`.
    pub fn velocity(position: Vec3, velocity: Vec3) -> Self {
        Self {
            start: position,
            end: position + velocity,
        }
    }
}

pub trait DebugOverlays {
    fn create(&mut self, geometry: LineGeometry) -> VisualHandle;
    fn update(&mut self, visual: VisualHandle, geometry: LineGeometry);
    fn destroy(&mut self, visual: VisualHandle);
}

/// Host without any visuals.
#[derive(Debug, Default)]
pub struct NoOverlays {
    next_id: u64,
}

impl DebugOverlays for NoOverlays {
    fn create(&mut self, _geometry: LineGeometry) -> VisualHandle {
        self.next_id += 1;
        VisualHandle(self.next_id)
    }

    fn update(&mut self, _visual: VisualHandle, _geometry: LineGeometry) {}

    fn destroy(&mut self, _visual: VisualHandle) {}
}
