use bevy::prelude::*;

/// Pose of a detected real-world surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePose {
    pub position: Vec3,
    pub orientation: Quat,
}

/// One hit-test result, produced once per render tick and overwritten on the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitSample {
    pub position: Vec3,
    pub orientation: Quat,
    pub valid: bool,
}

impl HitSample {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
            valid: true,
        }
    }

    /// Decomposes a platform world matrix; scale is discarded.
    pub fn from_world_matrix(world: Mat4) -> Self {
        let (_scale, orientation, position) = world.to_scale_rotation_translation();
        Self {
            position,
            orientation,
            valid: position.is_finite() && orientation.is_finite(),
        }
    }

    pub fn pose(&self) -> SurfacePose {
        SurfacePose {
            position: self.position,
            orientation: self.orientation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackingEvent {
    /// First valid sample after a gap. Carries the pose to auto-place at, at most once a session.
    Started { auto_place: Option<SurfacePose> },
    Lost,
}

/// Follows per-tick hit samples and reports tracking transitions.
#[derive(Debug, Clone, Default)]
pub struct HitSampleTracker {
    tracking: bool,
    surface: Option<SurfacePose>,
    auto_placed: bool,
}

impl HitSampleTracker {
    pub fn ingest(
        &mut self,
        sample: Option<HitSample>,
        auto_place: bool,
        placed: bool,
    ) -> Option<TrackingEvent> {
        let Some(sample) = sample.filter(|s| s.valid) else {
            if !self.tracking {
                return None;
            }
            self.tracking = false;
            return Some(TrackingEvent::Lost);
        };

        let pose = sample.pose();
        self.surface = Some(pose);

        if self.tracking {
            return None;
        }
        self.tracking = true;

        let auto_place = if auto_place && !placed && !self.auto_placed {
            self.auto_placed = true;
            Some(pose)
        } else {
            None
        };
        Some(TrackingEvent::Started { auto_place })
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Latest surface pose, only while tracking.
    pub fn current_surface(&self) -> Option<SurfacePose> {
        if self.tracking { self.surface } else { None }
    }

    pub fn reticle_visible(&self, placed: bool) -> bool {
        self.tracking && !placed
    }

    /// Forget tracking and re-arm auto-place for the next session.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
