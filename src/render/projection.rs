//! Pinhole camera looking down -z from (0, 0, z).
//!
//! Shared by every surface so painting and hit-testing agree on where a
//! panel lands on screen. Viewport coordinates are pixels with the origin
//! at the top-left and y growing downwards.

use crate::engine::catalog::CatalogId;

/// Projection parameters
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Axis-aligned screen rectangle of a projected panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub min: [f32; 2],
    pub max: [f32; 2],
    /// Distance from the camera along -z
    pub depth: f32,
}

impl ScreenRect {
    pub fn contains(&self, point: [f32; 2]) -> bool {
        point[0] >= self.min[0]
            && point[0] <= self.max[0]
            && point[1] >= self.min[1]
            && point[1] <= self.max[1]
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub config: CameraConfig,
    /// Viewport width, height in pixels
    pub viewport: [f32; 2],
    /// Observer z in world units
    pub z: f64,
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            viewport: [1280.0, 800.0],
            z: 0.0,
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = [width.max(1.0), height.max(1.0)];
    }

    pub fn aspect(&self) -> f32 {
        self.viewport[0] / self.viewport[1]
    }

    /// Pixels per world unit at distance 1.
    fn focal(&self) -> f32 {
        let half_fov = self.config.fov_y_degrees.to_radians() * 0.5;
        self.viewport[1] * 0.5 / half_fov.tan()
    }

    /// Project a panel centered at `position` with world `size`. `None` when
    /// the panel lies outside the near/far range.
    ///
    /// Depth is taken relative to the camera in `f64` before narrowing, so
    /// panels stay put however far the observer has travelled.
    pub fn project(&self, position: [f64; 3], size: [f64; 2]) -> Option<ScreenRect> {
        let depth = (self.z - position[2]) as f32;
        if depth < self.config.near || depth > self.config.far {
            return None;
        }

        let scale = self.focal() / depth;
        let cx = self.viewport[0] * 0.5 + position[0] as f32 * scale;
        let cy = self.viewport[1] * 0.5 - position[1] as f32 * scale;
        let hw = size[0] as f32 * 0.5 * scale;
        let hh = size[1] as f32 * 0.5 * scale;

        Some(ScreenRect {
            min: [cx - hw, cy - hh],
            max: [cx + hw, cy + hh],
            depth,
        })
    }
}

/// Nearest panel containing `point`.
pub fn pick<I>(camera: &Camera, panels: I, point: [f32; 2]) -> Option<CatalogId>
where
    I: IntoIterator<Item = (CatalogId, [f64; 3], [f64; 2])>,
{
    let mut best: Option<(CatalogId, f32)> = None;
    for (id, position, size) in panels {
        let Some(rect) = camera.project(position, size) else {
            continue;
        };
        if !rect.contains(point) {
            continue;
        }
        if best.map_or(true, |(_, depth)| rect.depth < depth) {
            best = Some((id, rect.depth));
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        let mut cam = Camera::new(CameraConfig::default());
        cam.set_viewport(800.0, 600.0);
        cam.z = 1.0;
        cam
    }

    #[test]
    fn test_centered_panel_projects_to_viewport_center() {
        let cam = camera();
        let rect = cam.project([0.0, 0.0, -1.0], [1.0, 1.0]).unwrap();
        assert!((rect.depth - 2.0).abs() < 1e-6);
        let cx = (rect.min[0] + rect.max[0]) * 0.5;
        let cy = (rect.min[1] + rect.max[1]) * 0.5;
        assert!((cx - 400.0).abs() < 1e-3);
        assert!((cy - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_farther_panels_are_smaller() {
        let cam = camera();
        let near = cam.project([0.0, 0.0, 0.0], [1.0, 1.0]).unwrap();
        let far = cam.project([0.0, 0.0, -9.0], [1.0, 1.0]).unwrap();
        let near_w = near.max[0] - near.min[0];
        let far_w = far.max[0] - far.min[0];
        assert!((near_w / far_w - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let cam = camera();
        let rect = cam.project([0.0, 1.0, -1.0], [0.1, 0.1]).unwrap();
        assert!(rect.max[1] < 300.0);
    }

    #[test]
    fn test_behind_camera_is_culled() {
        let cam = camera();
        assert!(cam.project([0.0, 0.0, 1.5], [1.0, 1.0]).is_none());
        assert!(cam.project([0.0, 0.0, 0.95], [1.0, 1.0]).is_none());
    }

    #[test]
    fn test_pick_prefers_nearest() {
        let cam = camera();
        let panels = vec![
            (5, [0.0, 0.0, -4.0], [1.0, 1.0]),
            (6, [0.0, 0.0, -1.0], [1.0, 1.0]),
            (7, [0.0, 0.0, 3.0], [1.0, 1.0]),
        ];
        assert_eq!(pick(&cam, panels.clone(), [400.0, 300.0]), Some(6));
        assert_eq!(pick(&cam, panels, [5.0, 5.0]), None);
    }

    #[test]
    fn test_projection_is_stable_far_down_the_tunnel() {
        let near = camera();
        let mut far = camera();
        let offset = 5.0e6;
        far.z -= offset;
        let a = near.project([0.3, -0.2, -1.0], [1.0, 0.75]).unwrap();
        let b = far.project([0.3, -0.2, -1.0 - offset], [1.0, 0.75]).unwrap();
        assert!((a.depth - b.depth).abs() < 1e-4);
        assert!((a.min[0] - b.min[0]).abs() < 1e-2);
        assert!((a.max[1] - b.max[1]).abs() < 1e-2);
    }

    #[test]
    fn test_resize_keeps_aspect() {
        let mut cam = camera();
        let before = cam.project([0.0, 0.0, -1.0], [1.0, 1.0]).unwrap();
        cam.set_viewport(1600.0, 600.0);
        let after = cam.project([0.0, 0.0, -1.0], [1.0, 1.0]).unwrap();
        // same height, so a square panel stays square
        assert!(((before.max[0] - before.min[0]) - (after.max[0] - after.min[0])).abs() < 1e-3);
        assert!((cam.aspect() - 1600.0 / 600.0).abs() < 1e-6);
    }
}
