pub mod headless;
pub mod panel_paint;
pub mod projection;

use crate::engine::catalog::CatalogId;
use crate::engine::window::VisibleItem;
use crate::net::image::Photo;

/// Opaque handle of a panel on a rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceHandle(pub u64);

/// Something that draws positioned photo panels as seen from the observer.
///
/// Points passed to `hit_test` are in pixels relative to the top-left of
/// the viewport last given to `resize`.
pub trait RenderSurface {
    fn add_item(&mut self, item: &VisibleItem, photo: &Photo) -> SurfaceHandle;
    fn remove_item(&mut self, handle: SurfaceHandle);
    fn set_observer_position(&mut self, z: f64);
    fn render_frame(&mut self);
    fn resize(&mut self, width: f32, height: f32);
    /// Id of the nearest panel under `point`, if any.
    fn hit_test(&self, point: [f32; 2]) -> Option<CatalogId>;
}
