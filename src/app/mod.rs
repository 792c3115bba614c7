//! `TunnelApp`: the top-level egui application state.
//!
//! Methods are split across the sibling sub-modules:
//!
//! - `content` draws the loading splash and the tunnel viewport
//! - `dialog` shows the full-resolution view of a clicked photo

pub mod content;
pub mod dialog;

use std::sync::Arc;

use eframe::egui;

use photo_tunnel::net::image::{HttpSource, LoadNotify};
use photo_tunnel::render::panel_paint::PanelSurface;
use photo_tunnel::{Session, TunnelConfig, TunnelError};

use dialog::PhotoDialog;

// ─── Application state ───────────────────────────────────────────────────────

pub struct TunnelApp {
    pub session: Session,
    pub surface: PanelSurface,
    /// Uncapped source for the full-resolution dialog
    pub full_res: Arc<HttpSource>,
    pub dialog: Option<PhotoDialog>,
}

impl TunnelApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: TunnelConfig) -> Result<Self, TunnelError> {
        let repaint_ctx = cc.egui_ctx.clone();
        let notify: LoadNotify = Arc::new(move || repaint_ctx.request_repaint());

        let full_res = Arc::new(HttpSource::new(&config.base_url, &config.extension, None)?);
        let surface = PanelSurface::new(cc.egui_ctx.clone(), config.camera.clone());
        let session = Session::connect(config, Some(notify))?;

        Ok(Self {
            session,
            surface,
            full_res,
            dialog: None,
        })
    }
}

impl eframe::App for TunnelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.poll_assets();

        if !self.session.try_start(&mut self.surface) {
            self.draw_splash(ctx);
            return;
        }

        self.draw_tunnel(ctx);
        self.draw_dialog(ctx);
    }
}
