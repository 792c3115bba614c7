//! Viewport rendering for `TunnelApp`.
//!
//! - `draw_splash` shows load progress until the startup gate opens
//! - `draw_tunnel` ticks the session and paints the panels, with hover
//!   feedback and click-to-open

use eframe::egui;

use super::dialog::PhotoDialog;
use super::TunnelApp;

const BACKGROUND: egui::Color32 = egui::Color32::BLACK;

impl TunnelApp {
    // ── Loading splash ───────────────────────────────────────────────────────

    pub fn draw_splash(&self, ctx: &egui::Context) {
        let catalog = self.session.catalog();
        let gate = self.session.config().gate_threshold;
        let available = catalog.available_count();
        let failed = catalog.failed_count();

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKGROUND))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.4);
                    ui.spinner();
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new(format!("Loading photos {} / {}", available, gate))
                            .color(egui::Color32::LIGHT_GRAY)
                            .size(16.0),
                    );
                    if failed > 0 {
                        ui.label(
                            egui::RichText::new(format!("{} failed", failed))
                                .color(egui::Color32::from_rgb(200, 90, 90))
                                .small(),
                        );
                    }
                });
            });
    }

    // ── Tunnel ───────────────────────────────────────────────────────────────

    pub fn draw_tunnel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKGROUND))
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click());
                if self.surface.set_viewport(rect) {
                    log::debug!("Viewport resized to {:.0}x{:.0}", rect.width(), rect.height());
                }

                self.session.tick(&mut self.surface);
                self.surface.paint(&ui.painter_at(rect));

                if let Some(pos) = response.hover_pos() {
                    let point = self.surface.to_viewport(pos);
                    if self.session.identifier_at(&self.surface, point).is_some() {
                        ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
                    }
                }

                if response.clicked() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        let point = self.surface.to_viewport(pos);
                        if let Some(id) = self.session.identifier_at(&self.surface, point) {
                            log::info!("Selected photo {}", id);
                            self.dialog = Some(PhotoDialog::open(id, &self.full_res, ctx));
                        }
                    }
                }
            });
    }
}
