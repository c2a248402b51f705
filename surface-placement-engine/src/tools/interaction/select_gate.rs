use bevy::prelude::*;

use super::hit_tracker::SurfacePose;

/// Request to place the object at the current surface pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceCommand {
    pub pose: SurfacePose,
}

/// Debounces platform select signals.
///
/// The platform emits the same select for a deliberate tap and for the release of a
/// drag or two-finger gesture. Gesture code pre-pays the releases it is about to cause
/// with `suppress_next`; the gate swallows that many selects before letting one through.
/// A genuine tap that lands inside the suppressed window is dropped as well.
#[derive(Debug, Clone, Default)]
pub struct SelectGate {
    pending: u32,
}

impl SelectGate {
    /// `surface` is the current surface pose, `None` when not tracking.
    pub fn on_select(&mut self, surface: Option<SurfacePose>) -> Option<PlaceCommand> {
        if self.pending > 0 {
            self.pending -= 1;
            debug!("Select suppressed ({} still pending)", self.pending);
            return None;
        }
        surface.map(|pose| PlaceCommand { pose })
    }

    pub fn suppress_next(&mut self, count: u32) {
        self.pending = self.pending.saturating_add(count);
    }

    pub fn pending(&self) -> u32 {
        self.pending
    }

    pub fn reset(&mut self) {
        self.pending = 0;
    }
}
