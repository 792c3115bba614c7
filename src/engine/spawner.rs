//! Spawner/recycler: run once per tick to keep the tunnel filled.
//!
//! 1. While the window does not reach `lookahead` past the observer, pick a
//!    random available id that is not already visible, place it one
//!    `margin` deeper than the deepest panel (or than the observer, when
//!    the window is empty) and hand it to the surface.
//!    An empty candidate set ends the loop for this tick (starvation).
//! 2. Remove every panel the observer has passed and detach it from the
//!    surface; its id becomes a candidate again.
//!
//! Spawning always happens before recycling within a tick.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::engine::catalog::{AssetCatalog, CatalogId};
use crate::engine::placement::PlacementConfig;
use crate::engine::window::{VisibilityWindow, VisibleItem, WindowEntry};
use crate::render::RenderSurface;

/// Look-ahead and spacing
#[derive(Debug, Clone)]
pub struct SpawnConfig {
    /// Depth ahead of the observer that must stay covered
    pub lookahead: f64,
    /// Gap between the observer and the start of the look-ahead range
    pub clearance: f64,
    /// z spacing between consecutive panels
    pub margin: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            lookahead: 15.0,
            clearance: 0.0,
            margin: 0.5,
        }
    }
}

/// What one spawn/recycle pass did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub spawned: usize,
    pub recycled: usize,
    /// The frontier was still short when candidates ran out
    pub starved: bool,
}

pub struct Spawner {
    config: SpawnConfig,
    placement: PlacementConfig,
    /// Whether the most recent spawn used the upper half of the grid
    upper_left: bool,
    rng: SmallRng,
}

impl Spawner {
    pub fn new(config: SpawnConfig, placement: PlacementConfig, rng: SmallRng) -> Self {
        Self {
            config,
            placement,
            upper_left: false,
            rng,
        }
    }

    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    pub fn upper_left(&self) -> bool {
        self.upper_left
    }

    /// Uniformly pick an available id that is not currently visible.
    pub fn pick_candidate(
        &mut self,
        catalog: &AssetCatalog,
        window: &VisibilityWindow,
    ) -> Option<CatalogId> {
        let candidates: Vec<CatalogId> = catalog
            .available_ids()
            .filter(|id| !window.contains(*id))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let index = (self.rng.random::<f64>() * candidates.len() as f64) as usize;
        candidates.get(index.min(candidates.len() - 1)).copied()
    }

    /// Top up the window, then recycle everything behind the observer.
    pub fn run<S: RenderSurface + ?Sized>(
        &mut self,
        window: &mut VisibilityWindow,
        catalog: &AssetCatalog,
        observer_z: f64,
        surface: &mut S,
    ) -> TickReport {
        let mut report = TickReport::default();

        while !window.frontier_satisfied(observer_z, self.config.clearance, self.config.lookahead) {
            let Some(id) = self.pick_candidate(catalog, window) else {
                log::debug!(
                    "No spawn candidates: {} visible, {} available",
                    window.len(),
                    catalog.available_count()
                );
                report.starved = true;
                break;
            };
            if !self.spawn(id, window, catalog, observer_z, surface) {
                report.starved = true;
                break;
            }
            report.spawned += 1;
        }

        for entry in window.remove_behind(observer_z) {
            log::trace!("Recycled photo {} at z={:.2}", entry.item.id, entry.item.z());
            surface.remove_item(entry.handle);
            report.recycled += 1;
        }

        report
    }

    /// z the next panel is placed behind. An empty window starts at 0, or
    /// at the observer once it has moved past 0.
    fn frontier(&self, window: &VisibilityWindow, observer_z: f64) -> f64 {
        if window.is_empty() {
            (observer_z - self.config.clearance).min(0.0)
        } else {
            window.min_z()
        }
    }

    fn spawn<S: RenderSurface + ?Sized>(
        &mut self,
        id: CatalogId,
        window: &mut VisibilityWindow,
        catalog: &AssetCatalog,
        observer_z: f64,
        surface: &mut S,
    ) -> bool {
        let Some(photo) = catalog.get(id) else {
            return false;
        };

        let slot = self.placement.slot_index(self.upper_left, &mut self.rng);
        let (x, y) = self.placement.place(slot, &mut self.rng);
        let z = self.frontier(window, observer_z) - self.config.margin;

        let width = self.placement.panel_width;
        let item = VisibleItem {
            id,
            position: [x, y, z],
            size: [width, photo.aspect() * width],
        };
        log::debug!("Spawned photo {} in slot {} at ({:.2}, {:.2}, {:.2})", id, slot, x, y, z);

        let handle = surface.add_item(&item, photo);
        window.add(WindowEntry { item, handle });
        self.upper_left = !self.upper_left;
        true
    }
}
