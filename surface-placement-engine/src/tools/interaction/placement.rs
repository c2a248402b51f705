use bevy::prelude::*;

use super::hit_tracker::SurfacePose;
use super::select_gate::PlaceCommand;

/// Committed transform of the placed object in the real-world frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub orientation: Quat,
    /// Uniform scale, always inside the configured bounds.
    pub scale: f32,
    /// Yaw applied on top of the surface orientation. Unbounded.
    pub rotation_y: f32,
}

impl Placement {
    pub fn at(pose: SurfacePose, scale: f32, rotation_y: f32) -> Self {
        Self {
            position: pose.position,
            orientation: pose.orientation,
            scale,
            rotation_y,
        }
    }

    /// Transform for the renderer: surface pose, then yaw and scale in the surface frame.
    pub fn transform(&self) -> Transform {
        Transform {
            translation: self.position,
            rotation: self.orientation * Quat::from_rotation_y(self.rotation_y),
            scale: Vec3::splat(self.scale),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PlacementState {
    #[default]
    Searching,
    Placed(Placement),
}

/// Why the placement changed, for logging and host notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementCause {
    AutoPlace,
    Tap,
    Drag,
    DragCommit,
    Scale,
    Rotate,
}

/// Searching/Placed state machine owning the single placement.
#[derive(Debug, Clone, Default)]
pub struct PlacementStateMachine {
    state: PlacementState,
}

impl PlacementStateMachine {
    pub fn state(&self) -> &PlacementState {
        &self.state
    }

    pub fn placement(&self) -> Option<&Placement> {
        match &self.state {
            PlacementState::Placed(placement) => Some(placement),
            PlacementState::Searching => None,
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self.state, PlacementState::Placed(_))
    }

    pub fn auto_place(&mut self, pose: SurfacePose, default_scale: f32) -> Placement {
        let placement = Placement::at(pose, default_scale, 0.0);
        self.state = PlacementState::Placed(placement);
        info!("Auto-placed at {:?}", placement.position);
        placement
    }

    /// Moves to the commanded surface pose, keeping scale and yaw of an existing placement.
    pub fn place(&mut self, command: PlaceCommand, default_scale: f32) -> Placement {
        let placement = match self.state {
            PlacementState::Placed(current) => {
                Placement::at(command.pose, current.scale, current.rotation_y)
            }
            PlacementState::Searching => Placement::at(command.pose, default_scale, 0.0),
        };
        self.state = PlacementState::Placed(placement);
        info!("Placed at {:?}", placement.position);
        placement
    }

    /// Live drag update of the ground-plane coordinates. Height is left alone.
    pub fn drag_to(&mut self, x: f32, z: f32) -> Option<Placement> {
        let placement = self.placement_mut()?;
        placement.position.x = x;
        placement.position.z = z;
        Some(*placement)
    }

    /// Commits the current dragged position as the placement.
    pub fn commit_drag(&mut self) -> Option<Placement> {
        let placement = *self.placement()?;
        info!("Drag committed at {:?}", placement.position);
        Some(placement)
    }

    pub fn set_scale(&mut self, scale: f32, min: f32, max: f32) -> Option<Placement> {
        let placement = self.placement_mut()?;
        placement.scale = scale.clamp(min, max);
        Some(*placement)
    }

    pub fn set_rotation_y(&mut self, rotation_y: f32) -> Option<Placement> {
        let placement = self.placement_mut()?;
        placement.rotation_y = rotation_y;
        Some(*placement)
    }

    pub fn reset(&mut self) {
        self.state = PlacementState::Searching;
    }

    fn placement_mut(&mut self) -> Option<&mut Placement> {
        match &mut self.state {
            PlacementState::Placed(placement) => Some(placement),
            PlacementState::Searching => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(position: Vec3) -> SurfacePose {
        SurfacePose {
            position,
            orientation: Quat::IDENTITY,
        }
    }

    #[test]
    fn starts_searching() {
        let machine = PlacementStateMachine::default();
        assert_eq!(machine.state(), &PlacementState::Searching);
        assert!(machine.placement().is_none());
    }

    #[test]
    fn tap_place_keeps_existing_scale_and_yaw() {
        let mut machine = PlacementStateMachine::default();
        machine.place(PlaceCommand { pose: pose(Vec3::ZERO) }, 0.3);
        machine.set_scale(1.2, 0.05, 2.0);
        machine.set_rotation_y(0.7);

        let moved = machine.place(PlaceCommand { pose: pose(Vec3::X) }, 0.3);
        assert_eq!(moved.position, Vec3::X);
        assert_eq!(moved.scale, 1.2);
        assert_eq!(moved.rotation_y, 0.7);
    }

    #[test]
    fn field_updates_need_a_placement() {
        let mut machine = PlacementStateMachine::default();
        assert!(machine.drag_to(1.0, 1.0).is_none());
        assert!(machine.set_scale(1.0, 0.05, 2.0).is_none());
        assert!(machine.set_rotation_y(1.0).is_none());
        assert!(machine.commit_drag().is_none());
        assert!(!machine.is_placed());
    }

    #[test]
    fn drag_keeps_height_and_orientation() {
        let mut machine = PlacementStateMachine::default();
        let orientation = Quat::from_rotation_x(0.1);
        machine.auto_place(
            SurfacePose {
                position: Vec3::new(0.0, 1.0, 0.0),
                orientation,
            },
            0.3,
        );
        let dragged = machine.drag_to(0.4, -0.2).unwrap();
        assert_eq!(dragged.position, Vec3::new(0.4, 1.0, -0.2));
        assert_eq!(dragged.orientation, orientation);
    }

    #[test]
    fn scale_is_clamped() {
        let mut machine = PlacementStateMachine::default();
        machine.auto_place(pose(Vec3::ZERO), 0.3);
        assert_eq!(machine.set_scale(10.0, 0.05, 2.0).unwrap().scale, 2.0);
        assert_eq!(machine.set_scale(0.0, 0.05, 2.0).unwrap().scale, 0.05);
    }

    #[test]
    fn transform_applies_yaw_in_surface_frame() {
        let placement = Placement {
            position: Vec3::new(1.0, 0.0, 0.0),
            orientation: Quat::IDENTITY,
            scale: 0.5,
            rotation_y: std::f32::consts::FRAC_PI_2,
        };
        let transform = placement.transform();
        assert_eq!(transform.scale, Vec3::splat(0.5));
        let forward = transform.rotation * Vec3::X;
        assert!(forward.distance(Vec3::NEG_Z) < 1e-5);
    }
}
