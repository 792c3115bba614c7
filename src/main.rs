use std::time::Duration;

use clap::Parser;
use eframe::egui;

use photo_tunnel::render::headless::HeadlessSurface;
use photo_tunnel::{CatalogId, CatalogRange, Session, TunnelConfig, TunnelError};

mod app;

#[derive(Parser, Debug)]
#[command(name = "photo-tunnel", about = "Fly through an endless field of photos")]
struct Args {
    /// Base URL photos are fetched from as `{base}{id}.{ext}`
    #[arg(long)]
    base_url: Option<String>,
    /// Photo file extension
    #[arg(long)]
    extension: Option<String>,
    /// First catalog id
    #[arg(long)]
    min_id: Option<CatalogId>,
    /// Last catalog id (inclusive)
    #[arg(long)]
    max_id: Option<CatalogId>,
    /// Photos that must load before the tunnel starts moving
    #[arg(long)]
    gate: Option<usize>,
    /// Depth ahead of the observer kept filled with panels
    #[arg(long)]
    lookahead: Option<f64>,
    /// z spacing between consecutive panels
    #[arg(long)]
    margin: Option<f64>,
    /// Observer movement per frame
    #[arg(long)]
    step: Option<f64>,
    /// Seed for placement and photo selection
    #[arg(long)]
    seed: Option<u64>,
    /// Background loader threads
    #[arg(long)]
    workers: Option<usize>,
    /// Run without a window and report spawn/recycle totals
    #[arg(long)]
    headless: bool,
    /// Ticks to run in headless mode
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Seconds to wait for the startup gate in headless mode
    #[arg(long, default_value_t = 60)]
    gate_timeout_secs: u64,
}

impl Args {
    fn to_config(&self) -> TunnelConfig {
        let mut cfg = TunnelConfig::default();
        if let Some(ref url) = self.base_url {
            cfg.base_url = url.clone();
        }
        if let Some(ref ext) = self.extension {
            cfg.extension = ext.clone();
        }
        cfg.catalog = CatalogRange::new(
            self.min_id.unwrap_or(cfg.catalog.min),
            self.max_id.unwrap_or(cfg.catalog.max),
        );
        if let Some(gate) = self.gate {
            cfg.gate_threshold = gate;
        }
        if let Some(lookahead) = self.lookahead {
            cfg.spawn.lookahead = lookahead;
        }
        if let Some(margin) = self.margin {
            cfg.spawn.margin = margin;
        }
        if let Some(step) = self.step {
            cfg.observer_step = step;
        }
        if let Some(workers) = self.workers {
            cfg.workers = workers;
        }
        cfg.seed = self.seed;
        cfg
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let config = args.to_config();

    if args.headless {
        let gate_timeout = Duration::from_secs(args.gate_timeout_secs);
        if let Err(e) = run_headless(config, args.ticks, gate_timeout) {
            log::error!("Headless run failed: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Photo Tunnel"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Photo Tunnel",
        options,
        Box::new(move |cc| {
            let app = app::TunnelApp::new(cc, config)?;
            Ok(Box::new(app))
        }),
    );
    if let Err(e) = result {
        log::error!("Failed to start Photo Tunnel: {}", e);
        std::process::exit(1);
    }
}

/// Drive a session against the headless surface and print the totals.
fn run_headless(config: TunnelConfig, ticks: u64, gate_timeout: Duration) -> Result<(), TunnelError> {
    let mut surface = HeadlessSurface::new(config.camera.clone());
    let mut session = Session::connect(config, None)?;

    let available = session.wait_for_gate(gate_timeout)?;
    log::info!("{} photos available after gate", available);

    for _ in 0..ticks {
        session.tick(&mut surface);
    }

    let stats = session.stats();
    log::info!(
        "Headless run finished: {} spawned, {} recycled over {} ticks",
        stats.spawned,
        stats.recycled,
        stats.ticks
    );
    println!(
        "ticks={} spawned={} recycled={} starved_passes={} visible={} failed={} observer_z={:.2}",
        stats.ticks,
        stats.spawned,
        stats.recycled,
        stats.starved_passes,
        session.window().len(),
        session.catalog().failed_count(),
        session.observer_z(),
    );
    Ok(())
}
