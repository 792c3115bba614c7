//! egui Painter surface for photo panels.
//!
//! Keeps one texture per catalog id (created on first spawn and reused when
//! the id comes back after recycling) and paints the live panels
//! back-to-front through the shared camera.

use std::collections::{BTreeMap, HashMap};

use egui::{pos2, Color32, ColorImage, Painter, Pos2, Rect, TextureHandle, TextureOptions};

use crate::engine::catalog::CatalogId;
use crate::engine::window::VisibleItem;
use crate::net::image::Photo;
use crate::render::projection::{pick, Camera, CameraConfig, ScreenRect};
use crate::render::{RenderSurface, SurfaceHandle};

pub struct PanelSurface {
    ctx: egui::Context,
    camera: Camera,
    /// Screen position of the viewport's top-left corner
    origin: Pos2,
    textures: HashMap<CatalogId, TextureHandle>,
    panels: BTreeMap<SurfaceHandle, VisibleItem>,
    next_handle: u64,
}

impl PanelSurface {
    pub fn new(ctx: egui::Context, camera: CameraConfig) -> Self {
        Self {
            ctx,
            camera: Camera::new(camera),
            origin: Pos2::ZERO,
            textures: HashMap::new(),
            panels: BTreeMap::new(),
            next_handle: 0,
        }
    }

    /// Track the screen rect the tunnel is painted into. Forwards a resize
    /// when the size changed; returns whether it did.
    pub fn set_viewport(&mut self, rect: Rect) -> bool {
        self.origin = rect.min;
        let [w, h] = self.camera.viewport;
        if (rect.width() - w).abs() < 0.5 && (rect.height() - h).abs() < 0.5 {
            return false;
        }
        self.resize(rect.width(), rect.height());
        true
    }

    /// Convert an absolute screen position to viewport coordinates.
    pub fn to_viewport(&self, pos: Pos2) -> [f32; 2] {
        [pos.x - self.origin.x, pos.y - self.origin.y]
    }

    pub fn texture(&self, id: CatalogId) -> Option<&TextureHandle> {
        self.textures.get(&id)
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Screen rects of the live panels, farthest first.
    fn draw_list(&self) -> Vec<(ScreenRect, &TextureHandle)> {
        let mut list: Vec<_> = self
            .panels
            .values()
            .filter_map(|item| {
                let rect = self.camera.project(item.position, item.size)?;
                let texture = self.textures.get(&item.id)?;
                Some((rect, texture))
            })
            .collect();
        list.sort_by(|a, b| b.0.depth.total_cmp(&a.0.depth));
        list
    }

    /// Paint every panel into `painter`.
    pub fn paint(&self, painter: &Painter) {
        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        let clip = painter.clip_rect();
        for (screen, texture) in self.draw_list() {
            let rect = Rect::from_min_max(
                pos2(self.origin.x + screen.min[0], self.origin.y + screen.min[1]),
                pos2(self.origin.x + screen.max[0], self.origin.y + screen.max[1]),
            );
            if !clip.intersects(rect) {
                continue;
            }
            painter.image(texture.id(), rect, uv, Color32::WHITE);
        }
    }
}

impl RenderSurface for PanelSurface {
    fn add_item(&mut self, item: &VisibleItem, photo: &Photo) -> SurfaceHandle {
        let ctx = &self.ctx;
        self.textures.entry(item.id).or_insert_with(|| {
            let image = ColorImage::from_rgba_unmultiplied(
                [photo.width as usize, photo.height as usize],
                &photo.rgba,
            );
            ctx.load_texture(format!("photo_{}", item.id), image, TextureOptions::LINEAR)
        });

        let handle = SurfaceHandle(self.next_handle);
        self.next_handle += 1;
        self.panels.insert(handle, item.clone());
        handle
    }

    fn remove_item(&mut self, handle: SurfaceHandle) {
        self.panels.remove(&handle);
    }

    fn set_observer_position(&mut self, z: f64) {
        self.camera.z = z;
    }

    fn render_frame(&mut self) {
        self.ctx.request_repaint();
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.camera.set_viewport(width, height);
    }

    fn hit_test(&self, point: [f32; 2]) -> Option<CatalogId> {
        pick(
            &self.camera,
            self.panels.values().map(|item| (item.id, item.position, item.size)),
            point,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: CatalogId) -> Photo {
        Photo {
            id,
            width: 2,
            height: 2,
            rgba: vec![255; 2 * 2 * 4],
        }
    }

    fn item(id: CatalogId, z: f64) -> VisibleItem {
        VisibleItem {
            id,
            position: [0.0, 0.0, z],
            size: [1.0, 1.0],
        }
    }

    #[test]
    fn test_texture_reused_after_recycle() {
        let mut surface = PanelSurface::new(egui::Context::default(), CameraConfig::default());
        let first = surface.add_item(&item(3, -1.0), &photo(3));
        let tex_id = surface.texture(3).unwrap().id();
        surface.remove_item(first);
        assert_eq!(surface.panel_count(), 0);

        let second = surface.add_item(&item(3, -5.0), &photo(3));
        assert_ne!(first, second);
        assert_eq!(surface.texture(3).unwrap().id(), tex_id);
    }

    #[test]
    fn test_hit_test_in_viewport_coordinates() {
        let mut surface = PanelSurface::new(egui::Context::default(), CameraConfig::default());
        let rect = Rect::from_min_size(pos2(100.0, 50.0), egui::vec2(800.0, 600.0));
        assert!(surface.set_viewport(rect));
        assert!(!surface.set_viewport(rect));
        surface.set_observer_position(1.0);
        surface.add_item(&item(8, -1.0), &photo(8));
        surface.add_item(&item(9, -3.0), &photo(9));

        let center = surface.to_viewport(pos2(500.0, 350.0));
        assert_eq!(center, [400.0, 300.0]);
        assert_eq!(surface.hit_test(center), Some(8));
        assert_eq!(surface.draw_list().len(), 2);
        assert!(surface.draw_list()[0].0.depth > surface.draw_list()[1].0.depth);
    }
}
