//! Full-resolution view of a selected photo.
//!
//! The download runs on a spawned thread; the result comes back over a
//! channel and is turned into a texture on the UI thread. Dropping the
//! dialog drops the texture.

use std::sync::{mpsc, Arc};

use eframe::egui;

use photo_tunnel::net::image::{AssetSource, HttpSource, Photo};
use photo_tunnel::{AssetError, CatalogId};

pub enum DialogStatus {
    Loading,
    Ready {
        texture: egui::TextureHandle,
        size: egui::Vec2,
    },
    Error(String),
}

pub struct PhotoDialog {
    pub id: CatalogId,
    pub url: String,
    pub status: DialogStatus,
    rx: Option<mpsc::Receiver<Result<Photo, AssetError>>>,
}

impl PhotoDialog {
    /// Start fetching photo `id` at full resolution.
    pub fn open(id: CatalogId, source: &Arc<HttpSource>, ctx: &egui::Context) -> Self {
        let url = match source.url_for(id) {
            Ok(url) => url.to_string(),
            Err(e) => {
                return Self {
                    id,
                    url: String::new(),
                    status: DialogStatus::Error(e.to_string()),
                    rx: None,
                }
            }
        };

        let (tx, rx) = mpsc::channel();
        let source = Arc::clone(source);
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let _ = tx.send(source.load(id));
            ctx.request_repaint();
        });

        Self {
            id,
            url,
            status: DialogStatus::Loading,
            rx: Some(rx),
        }
    }

    /// Pick up the download result if it has arrived.
    pub fn poll(&mut self, ctx: &egui::Context) {
        let Some(rx) = &self.rx else {
            return;
        };
        let Ok(result) = rx.try_recv() else {
            return;
        };

        self.status = match result {
            Ok(photo) => {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [photo.width as usize, photo.height as usize],
                    &photo.rgba,
                );
                let texture = ctx.load_texture(
                    format!("full_{}", self.id),
                    image,
                    egui::TextureOptions::LINEAR,
                );
                DialogStatus::Ready {
                    texture,
                    size: egui::vec2(photo.width as f32, photo.height as f32),
                }
            }
            Err(e) => {
                log::warn!("Full-resolution load failed: {}", e);
                DialogStatus::Error(e.to_string())
            }
        };
        self.rx = None;
    }

    /// Draw the dialog window. Returns false once the user closed it.
    pub fn show(&mut self, ctx: &egui::Context) -> bool {
        let mut open = true;
        egui::Window::new(format!("Photo {}", self.id))
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .pivot(egui::Align2::CENTER_CENTER)
            .default_pos(ctx.screen_rect().center())
            .default_size([720.0, 560.0])
            .show(ctx, |ui| {
                match &self.status {
                    DialogStatus::Loading => {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Loading full resolution…");
                        });
                    }
                    DialogStatus::Ready { texture, size } => {
                        let avail = ui.available_size() - egui::vec2(0.0, 24.0);
                        let scale = (avail.x / size.x).min(avail.y / size.y).clamp(0.05, 1.0);
                        ui.image((texture.id(), *size * scale));
                    }
                    DialogStatus::Error(message) => {
                        ui.colored_label(egui::Color32::from_rgb(200, 60, 60), message);
                    }
                }
                if !self.url.is_empty() {
                    ui.hyperlink_to(&self.url, &self.url);
                }
            });

        let escape = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        open && !escape
    }
}

impl super::TunnelApp {
    pub fn draw_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        dialog.poll(ctx);
        if !dialog.show(ctx) {
            log::debug!("Closed photo {}", dialog.id);
            self.dialog = None;
        }
    }
}
