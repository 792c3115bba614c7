//! Visibility window: the panels currently instantiated in the tunnel.
//!
//! Observer and panels live on the z axis; the observer moves towards
//! negative z, so a panel with `z > observer_z` is behind it.

use std::collections::HashSet;

use crate::engine::catalog::CatalogId;
use crate::render::SurfaceHandle;

/// One instantiated photo panel.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleItem {
    pub id: CatalogId,
    /// Panel center {x, y, z}
    pub position: [f64; 3],
    /// Width, height in world units
    pub size: [f64; 2],
}

impl VisibleItem {
    pub fn z(&self) -> f64 {
        self.position[2]
    }
}

/// A visible item together with its handle on the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowEntry {
    pub item: VisibleItem,
    pub handle: SurfaceHandle,
}

#[derive(Debug, Default)]
pub struct VisibilityWindow {
    entries: Vec<WindowEntry>,
    ids: HashSet<CatalogId>,
}

impl VisibilityWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. The caller guarantees its id is not present yet.
    pub fn add(&mut self, entry: WindowEntry) {
        let fresh = self.ids.insert(entry.item.id);
        debug_assert!(fresh, "photo {} is already visible", entry.item.id);
        self.entries.push(entry);
    }

    /// Remove and return every entry whose z exceeds `observer_z`.
    pub fn remove_behind(&mut self, observer_z: f64) -> Vec<WindowEntry> {
        let (behind, ahead): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|e| e.item.z() > observer_z);
        self.entries = ahead;
        for e in &behind {
            self.ids.remove(&e.item.id);
        }
        behind
    }

    /// True iff the window is non-empty and its deepest panel reaches at
    /// least `lookahead` past `observer_z - clearance`.
    pub fn frontier_satisfied(&self, observer_z: f64, clearance: f64, lookahead: f64) -> bool {
        self.deepest()
            .is_some_and(|z| z <= observer_z - clearance - lookahead)
    }

    /// Smallest z among the panels; 0 when empty.
    pub fn min_z(&self) -> f64 {
        self.deepest().unwrap_or(0.0)
    }

    fn deepest(&self) -> Option<f64> {
        self.entries.iter().map(|e| e.item.z()).reduce(f64::min)
    }

    pub fn contains(&self, id: CatalogId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowEntry> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = CatalogId> + '_ {
        self.entries.iter().map(|e| e.item.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: CatalogId, z: f64) -> WindowEntry {
        WindowEntry {
            item: VisibleItem {
                id,
                position: [0.0, 0.0, z],
                size: [1.0, 1.0],
            },
            handle: SurfaceHandle(u64::from(id)),
        }
    }

    #[test]
    fn test_empty_window() {
        let window = VisibilityWindow::new();
        assert_eq!(window.min_z(), 0.0);
        assert!(!window.frontier_satisfied(1.0, 0.0, 0.0));
        assert!(window.is_empty());
    }

    #[test]
    fn test_min_z_tracks_deepest_panel() {
        let mut window = VisibilityWindow::new();
        window.add(entry(1, -0.5));
        window.add(entry(2, -1.0));
        window.add(entry(3, -0.75));
        assert_eq!(window.min_z(), -1.0);
        assert!(window.contains(2));
        assert!(!window.contains(4));
    }

    #[test]
    fn test_min_z_is_the_true_minimum() {
        let mut window = VisibilityWindow::new();
        window.add(entry(1, 4.0));
        window.add(entry(2, 2.5));
        assert_eq!(window.min_z(), 2.5);
        assert!(window.frontier_satisfied(20.0, 0.0, 15.0));
        assert!(!window.frontier_satisfied(10.0, 0.0, 15.0));
    }

    #[test]
    fn test_frontier() {
        let mut window = VisibilityWindow::new();
        window.add(entry(1, -0.5));
        window.add(entry(2, -14.0));
        assert!(window.frontier_satisfied(1.0, 0.0, 15.0));
        assert!(!window.frontier_satisfied(1.0, 0.5, 15.0));
        assert!(!window.frontier_satisfied(0.0, 0.0, 15.0));
    }

    #[test]
    fn test_remove_behind_only_takes_passed_panels() {
        let mut window = VisibilityWindow::new();
        window.add(entry(1, 0.9));
        window.add(entry(2, 0.5));
        window.add(entry(3, 0.1));
        let removed = window.remove_behind(0.5);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].item.id, 1);
        // a panel exactly at the observer stays
        assert!(window.contains(2));
        assert!(!window.contains(1));
        assert_eq!(window.ids().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_removed_id_can_return() {
        let mut window = VisibilityWindow::new();
        window.add(entry(7, 2.0));
        window.remove_behind(1.0);
        window.add(entry(7, -3.0));
        assert_eq!(window.len(), 1);
    }
}
