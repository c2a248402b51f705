use bevy::prelude::*;

/// Below this vertical ray component the ray is treated as parallel to the ground.
const PARALLEL_EPSILON: f32 = 0.001;

/// Camera state needed to turn a viewport pixel into a world-space ray.
///
/// Clip space follows Bevy's reverse-Z convention (near plane at NDC depth 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSnapshot {
    /// Logical viewport size in pixels.
    pub viewport: Vec2,
    pub world_from_view: Mat4,
    pub clip_from_view: Mat4,
}

impl ViewSnapshot {
    pub fn new(viewport: Vec2, world_from_view: Mat4, clip_from_view: Mat4) -> Self {
        Self {
            viewport,
            world_from_view,
            clip_from_view,
        }
    }

    /// Snapshot of a live Bevy camera, `None` until the camera has a viewport.
    pub fn from_camera(camera: &Camera, camera_transform: &GlobalTransform) -> Option<Self> {
        let viewport = camera.logical_viewport_size()?;
        Some(Self::new(
            viewport,
            camera_transform.compute_matrix(),
            camera.clip_from_view(),
        ))
    }

    /// Normalised device coordinates of a viewport pixel (y up).
    pub fn to_ndc(&self, screen: Vec2) -> Option<Vec2> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            (screen.x / self.viewport.x) * 2.0 - 1.0,
            -(screen.y / self.viewport.y) * 2.0 + 1.0,
        ))
    }

    /// World ray through a viewport pixel, starting on the near plane.
    pub fn ray_through(&self, screen: Vec2) -> Option<Ray3d> {
        let ndc = self.to_ndc(screen)?;
        let world_from_clip = self.world_from_view * self.clip_from_view.inverse();

        let near = world_from_clip.project_point3(ndc.extend(1.0));
        let far = world_from_clip.project_point3(ndc.extend(f32::EPSILON));
        if !near.is_finite() || !far.is_finite() {
            return None;
        }

        let direction = Dir3::new(far - near).ok()?;
        Some(Ray3d::new(near, direction))
    }
}

/// Projects a viewport pixel onto the horizontal plane `y = height`.
///
/// `None` when the ray runs parallel to the plane or points away from it; callers
/// treat that as "nothing to do this event".
pub fn project_to_ground(view: &ViewSnapshot, screen: Vec2, height: f32) -> Option<Vec3> {
    let ray = view.ray_through(screen)?;
    intersect_horizontal_plane(&ray, height)
}

pub fn intersect_horizontal_plane(ray: &Ray3d, height: f32) -> Option<Vec3> {
    if ray.direction.y.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = (height - ray.origin.y) / ray.direction.y;
    if t > 0.0 {
        Some(ray.origin + ray.direction * t)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    // Camera 3m up looking straight down, 90deg fov, square 200px viewport.
    fn top_down_view() -> ViewSnapshot {
        let transform =
            Transform::from_xyz(0.0, 3.0, 0.0).looking_at(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z);
        ViewSnapshot::new(
            Vec2::new(200.0, 200.0),
            transform.compute_matrix(),
            Mat4::perspective_infinite_reverse_rh(FRAC_PI_2, 1.0, 0.1),
        )
    }

    #[test]
    fn centre_pixel_hits_directly_below_camera() {
        let hit = project_to_ground(&top_down_view(), Vec2::new(100.0, 100.0), 1.0).unwrap();
        assert!(hit.distance(Vec3::new(0.0, 1.0, 0.0)) < 1e-3, "hit was {hit:?}");
    }

    #[test]
    fn off_centre_pixel_follows_field_of_view() {
        // Right edge of a 90deg frustum: one unit sideways per unit of depth.
        let hit = project_to_ground(&top_down_view(), Vec2::new(200.0, 100.0), 1.0).unwrap();
        assert!(hit.distance(Vec3::new(2.0, 1.0, 0.0)) < 1e-3, "hit was {hit:?}");

        // Screen down maps to +Z for this camera orientation.
        let hit = project_to_ground(&top_down_view(), Vec2::new(100.0, 150.0), 1.0).unwrap();
        assert!(hit.distance(Vec3::new(0.0, 1.0, 1.0)) < 1e-3, "hit was {hit:?}");
    }

    #[test]
    fn plane_above_camera_is_a_miss() {
        assert!(project_to_ground(&top_down_view(), Vec2::new(100.0, 100.0), 5.0).is_none());
    }

    #[test]
    fn parallel_ray_is_a_miss() {
        let ray = Ray3d::new(Vec3::new(0.0, 1.0, 0.0), Dir3::X);
        assert!(intersect_horizontal_plane(&ray, 0.0).is_none());
    }

    #[test]
    fn empty_viewport_has_no_ray() {
        let mut view = top_down_view();
        view.viewport = Vec2::ZERO;
        assert!(view.ray_through(Vec2::new(10.0, 10.0)).is_none());
    }
}
