//! One tunnel session: catalog, window, spawner and observer in a single
//! context object.
//!
//! Lifecycle:
//! - `Loading` until `gate_threshold` photos are available. Ticks only
//!   apply finished loads.
//! - `Running` from then on. Opening the gate fills the window before the
//!   first frame; every later tick advances the observer, runs the
//!   spawner and renders.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::TunnelConfig;
use crate::engine::catalog::{AssetCatalog, CatalogId};
use crate::engine::motion::MotionDriver;
use crate::engine::spawner::{Spawner, TickReport};
use crate::engine::window::VisibilityWindow;
use crate::error::TunnelError;
use crate::net::image::{HttpSource, LoadNotify, PhotoLoader};
use crate::render::RenderSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Running,
}

/// Running totals over the session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub ticks: u64,
    pub spawned: u64,
    pub recycled: u64,
    /// Passes that ran out of candidates before the frontier was covered
    pub starved_passes: u64,
}

impl SessionStats {
    fn record(&mut self, report: &TickReport) {
        self.spawned += report.spawned as u64;
        self.recycled += report.recycled as u64;
        self.starved_passes += u64::from(report.starved);
    }
}

pub struct Session {
    config: TunnelConfig,
    catalog: AssetCatalog,
    window: VisibilityWindow,
    spawner: Spawner,
    motion: MotionDriver,
    phase: Phase,
    stats: SessionStats,
}

impl Session {
    pub fn new(config: TunnelConfig, catalog: AssetCatalog) -> Result<Self, TunnelError> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random::<u64>);
        log::info!("Session seed {}", seed);
        let spawner = Spawner::new(
            config.spawn.clone(),
            config.placement.clone(),
            SmallRng::seed_from_u64(seed),
        );
        let motion = MotionDriver::new(config.initial_observer_z, config.observer_step);

        Ok(Self {
            config,
            catalog,
            window: VisibilityWindow::new(),
            spawner,
            motion,
            phase: Phase::Loading,
            stats: SessionStats::default(),
        })
    }

    /// Session backed by the HTTP catalog, with every photo already
    /// requested. `notify` runs on a loader thread after each load settles.
    pub fn connect(config: TunnelConfig, notify: Option<LoadNotify>) -> Result<Self, TunnelError> {
        config.validate()?;
        let source = HttpSource::new(&config.base_url, &config.extension, Some(config.panel_max_width))?;
        let mut loader = PhotoLoader::new(Arc::new(source), config.workers)?;
        if let Some(notify) = notify {
            loader = loader.with_notify(notify);
        }

        let mut catalog = AssetCatalog::with_loader(config.catalog, loader);
        let issued = catalog.request_all();
        log::info!("Requested {} photos from {}", issued, config.base_url);
        Self::new(config, catalog)
    }

    /// Apply finished loads. Returns how many photos became available.
    pub fn poll_assets(&mut self) -> usize {
        self.catalog.poll()
    }

    /// Block until the startup gate can open or `timeout` passes.
    pub fn wait_for_gate(&mut self, timeout: Duration) -> Result<usize, TunnelError> {
        self.catalog
            .wait_until_available(self.config.gate_threshold, timeout)
    }

    /// Open the gate once enough photos are available and fill the window
    /// for the current observer position. Returns true while running.
    pub fn try_start<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if self.phase == Phase::Running {
            return true;
        }
        let available = self.catalog.available_count();
        if available < self.config.gate_threshold {
            return false;
        }

        log::info!(
            "Gate open: {} of {} photos loaded",
            available,
            self.config.gate_threshold
        );
        self.phase = Phase::Running;

        let z = self.motion.observer_z();
        surface.set_observer_position(z);
        let report = self.spawner.run(&mut self.window, &self.catalog, z, surface);
        self.stats.record(&report);
        true
    }

    /// One animation tick: move the observer, top up and recycle, render.
    pub fn tick<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> TickReport {
        self.poll_assets();
        if !self.try_start(surface) {
            return TickReport::default();
        }

        let z = self.motion.advance();
        let report = self.spawner.run(&mut self.window, &self.catalog, z, surface);
        surface.set_observer_position(z);
        surface.render_frame();

        self.stats.ticks += 1;
        self.stats.record(&report);
        report
    }

    /// Id of the visible photo under a viewport point.
    pub fn identifier_at<S: RenderSurface + ?Sized>(&self, surface: &S, point: [f32; 2]) -> Option<CatalogId> {
        surface
            .hit_test(point)
            .filter(|id| self.window.contains(*id))
    }

    pub fn config(&self) -> &TunnelConfig {
        &self.config
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut AssetCatalog {
        &mut self.catalog
    }

    pub fn window(&self) -> &VisibilityWindow {
        &self.window
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn observer_z(&self) -> f64 {
        self.motion.observer_z()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }
}
