//! Surface without a window: tracks panels and counts frames.
//!
//! Used by `--headless` runs and by tests that need to observe what the
//! spawner hands to the renderer.

use std::collections::BTreeMap;

use crate::engine::catalog::CatalogId;
use crate::engine::window::VisibleItem;
use crate::net::image::Photo;
use crate::render::projection::{pick, Camera, CameraConfig};
use crate::render::{RenderSurface, SurfaceHandle};

#[derive(Debug)]
pub struct HeadlessSurface {
    camera: Camera,
    items: BTreeMap<SurfaceHandle, VisibleItem>,
    next_handle: u64,
    /// Frames rendered so far
    pub frames: u64,
    /// Panels ever added
    pub added: u64,
    /// Panels ever removed
    pub removed: u64,
}

impl HeadlessSurface {
    pub fn new(camera: CameraConfig) -> Self {
        Self {
            camera: Camera::new(camera),
            items: BTreeMap::new(),
            next_handle: 0,
            frames: 0,
            added: 0,
            removed: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn observer_z(&self) -> f64 {
        self.camera.z
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn items(&self) -> impl Iterator<Item = (SurfaceHandle, &VisibleItem)> {
        self.items.iter().map(|(h, item)| (*h, item))
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl RenderSurface for HeadlessSurface {
    fn add_item(&mut self, item: &VisibleItem, _photo: &Photo) -> SurfaceHandle {
        let handle = SurfaceHandle(self.next_handle);
        self.next_handle += 1;
        self.items.insert(handle, item.clone());
        self.added += 1;
        handle
    }

    fn remove_item(&mut self, handle: SurfaceHandle) {
        if self.items.remove(&handle).is_some() {
            self.removed += 1;
        }
    }

    fn set_observer_position(&mut self, z: f64) {
        self.camera.z = z;
    }

    fn render_frame(&mut self) {
        self.frames += 1;
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.camera.set_viewport(width, height);
    }

    fn hit_test(&self, point: [f32; 2]) -> Option<CatalogId> {
        pick(
            &self.camera,
            self.items.values().map(|item| (item.id, item.position, item.size)),
            point,
        )
    }
}
