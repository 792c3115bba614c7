//! Placement engine: slot index → (x, y) on the plane facing the observer.
//!
//! Slots live on a `grid_width × grid_height` grid. The column is
//! `slot % grid_width`, the row `slot / grid_width`. The base position
//! interpolates the spawn bounds by column/row and a uniform jitter in
//! `[0, jitter)` is added to each axis.
//!
//! Consecutive spawns alternate between the two halves of the slot range
//! (see `slot_index`) so repeated spawns don't pile up on one side.

use rand::Rng;

/// Spawn grid and bounds
#[derive(Debug, Clone)]
pub struct PlacementConfig {
    pub grid_width: u32,
    pub grid_height: u32,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    /// Panel width in world units; panel height follows the photo aspect
    pub panel_width: f64,
    /// Upper bound of the random offset added to x and y
    pub jitter: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            grid_width: 3,
            grid_height: 2,
            min_x: -2.0,
            max_x: 2.0,
            min_y: -2.0,
            max_y: 2.0,
            panel_width: 1.0,
            jitter: 0.5,
        }
    }
}

impl PlacementConfig {
    /// Pick the slot for the next spawn.
    ///
    /// A column is drawn uniformly from `0..grid_width`; when `upper_left`
    /// is set, one full row (`grid_width`) is added on top.
    pub fn slot_index<R: Rng + ?Sized>(&self, upper_left: bool, rng: &mut R) -> u32 {
        let draw = (rng.random::<f64>() * f64::from(self.grid_width)) as u32;
        u32::from(upper_left) * self.grid_width + draw.min(self.grid_width.saturating_sub(1))
    }

    /// Grid position of a slot before jitter.
    pub fn base_position(&self, slot: u32) -> (f64, f64) {
        let gw = f64::from(self.grid_width);
        let gh = f64::from(self.grid_height);
        let grid_x = f64::from(slot % self.grid_width);
        let grid_y = f64::from(slot / self.grid_width);

        let base_x = self.min_x + grid_x * (self.max_x - self.min_x) / gw + gw / 2.0 - self.panel_width;
        let base_y = self.min_y + grid_y * (self.max_y - self.min_y) / gh + gh / 2.0;
        (base_x, base_y)
    }

    /// Final (x, y) for a slot: base position plus independent x/y jitter.
    pub fn place<R: Rng + ?Sized>(&self, slot: u32, rng: &mut R) -> (f64, f64) {
        let (base_x, base_y) = self.base_position(slot);
        let x = base_x + rng.random::<f64>() * self.jitter;
        let y = base_y + rng.random::<f64>() * self.jitter;
        (x, y)
    }
}
