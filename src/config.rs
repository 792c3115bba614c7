//! Top-level tunables for a tunnel session.
//!
//! Each component keeps its own config struct next to its code; this module
//! gathers them into one `TunnelConfig` whose `Default` reproduces the
//! reference gallery (81 photos on S3, 30-photo startup gate).

use crate::engine::catalog::CatalogRange;
use crate::engine::placement::PlacementConfig;
use crate::engine::spawner::SpawnConfig;
use crate::error::ConfigError;
use crate::render::projection::CameraConfig;

/// Configuration for a whole tunnel session
#[derive(Debug, Clone)]
pub struct TunnelConfig {
    /// Prefix every photo URL is joined onto
    pub base_url: String,
    /// File extension of catalog photos
    pub extension: String,
    /// Valid catalog ids (inclusive)
    pub catalog: CatalogRange,
    pub spawn: SpawnConfig,
    pub placement: PlacementConfig,
    pub camera: CameraConfig,
    /// Observer z before the first tick
    pub initial_observer_z: f64,
    /// Distance the observer moves forward per tick
    pub observer_step: f64,
    /// Photos that must be loaded before the first tick
    pub gate_threshold: usize,
    /// Panel textures wider than this are downscaled
    pub panel_max_width: u32,
    /// Background loader threads
    pub workers: usize,
    /// Fixed RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://buster-photos.s3.amazonaws.com/".into(),
            extension: "webp".into(),
            catalog: CatalogRange::new(1, 81),
            spawn: SpawnConfig::default(),
            placement: PlacementConfig::default(),
            camera: CameraConfig::default(),
            initial_observer_z: 1.0,
            observer_step: 0.01,
            gate_threshold: 30,
            panel_max_width: 512,
            workers: 8,
            seed: None,
        }
    }
}

impl TunnelConfig {
    /// Reject configurations the spawn loop or the startup gate cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.min > self.catalog.max {
            return Err(ConfigError::EmptyRange {
                min: self.catalog.min,
                max: self.catalog.max,
            });
        }
        if self.placement.grid_width == 0 || self.placement.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.placement.grid_width,
                height: self.placement.grid_height,
            });
        }
        // written so NaN fails too
        if !(self.spawn.margin > 0.0) {
            return Err(ConfigError::NonPositiveMargin(self.spawn.margin));
        }
        if !(self.spawn.lookahead >= 0.0) {
            return Err(ConfigError::NegativeLookahead(self.spawn.lookahead));
        }
        if !(self.observer_step > 0.0) {
            return Err(ConfigError::NonPositiveStep(self.observer_step));
        }
        if self.gate_threshold > self.catalog.len() {
            return Err(ConfigError::GateTooLarge {
                gate: self.gate_threshold,
                catalog: self.catalog.len(),
            });
        }
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = TunnelConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.catalog.len(), 81);
        assert_eq!(cfg.gate_threshold, 30);
    }

    #[test]
    fn test_rejects_inverted_range() {
        let mut cfg = TunnelConfig::default();
        cfg.catalog = CatalogRange::new(10, 5);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::EmptyRange { min: 10, max: 5 })
        );
    }

    #[test]
    fn test_rejects_gate_larger_than_catalog() {
        let mut cfg = TunnelConfig::default();
        cfg.catalog = CatalogRange::new(1, 10);
        cfg.gate_threshold = 11;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::GateTooLarge { gate: 11, catalog: 10 })
        );
    }

    #[test]
    fn test_rejects_zero_margin_and_grid() {
        let mut cfg = TunnelConfig::default();
        cfg.spawn.margin = 0.0;
        assert_eq!(cfg.validate(), Err(ConfigError::NonPositiveMargin(0.0)));

        let mut cfg = TunnelConfig::default();
        cfg.placement.grid_width = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyGrid { .. })));
    }

    #[test]
    fn test_rejects_backward_or_stalled_observer() {
        for step in [0.0, -0.01, f64::NAN] {
            let mut cfg = TunnelConfig::default();
            cfg.observer_step = step;
            assert!(
                matches!(cfg.validate(), Err(ConfigError::NonPositiveStep(_))),
                "step {} accepted",
                step
            );
        }
    }

    #[test]
    fn test_rejects_nan_spacing() {
        let mut cfg = TunnelConfig::default();
        cfg.spawn.margin = f64::NAN;
        assert!(matches!(cfg.validate(), Err(ConfigError::NonPositiveMargin(m)) if m.is_nan()));

        let mut cfg = TunnelConfig::default();
        cfg.spawn.lookahead = f64::NAN;
        assert!(matches!(cfg.validate(), Err(ConfigError::NegativeLookahead(l)) if l.is_nan()));

        let mut cfg = TunnelConfig::default();
        cfg.spawn.lookahead = 0.0;
        assert_eq!(cfg.validate(), Ok(()));
    }
}
