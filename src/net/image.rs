//! Asynchronous photo loader.
//!
//! Runs downloads and decoding on a background rayon pool and hands each
//! finished photo back to the control thread as a `LoadEvent` over a
//! channel. Nothing here touches the catalog directly: the owner drains
//! the channel with `poll` (once per frame) or `wait` (startup gate).

use std::collections::HashSet;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::engine::catalog::CatalogId;
use crate::error::{AssetError, TunnelError};
use crate::net::fetch::{build_client, fetch_bytes, parse_base_url, photo_url};

/// Decoded photo (RGBA).
#[derive(Clone)]
pub struct Photo {
    pub id: CatalogId,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Photo {
    /// Height over width, used to size the on-screen panel.
    pub fn aspect(&self) -> f64 {
        f64::from(self.height) / f64::from(self.width)
    }
}

impl std::fmt::Debug for Photo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Photo")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Decode encoded image bytes, downscaling anything wider than `max_width`.
pub fn decode_photo(id: CatalogId, bytes: &[u8], max_width: Option<u32>) -> Result<Photo, AssetError> {
    let img = image::load_from_memory(bytes).map_err(|source| AssetError::Decode { id, source })?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    if w == 0 || h == 0 {
        return Err(AssetError::Empty { id });
    }

    let (width, height, rgba) = match max_width {
        Some(max) if max > 0 && w > max => {
            let ratio = max as f32 / w as f32;
            let new_h = ((h as f32 * ratio) as u32).max(1);
            let resized = image::imageops::resize(&rgba, max, new_h, image::imageops::FilterType::Triangle);
            let (rw, rh) = resized.dimensions();
            (rw, rh, resized.into_raw())
        }
        _ => (w, h, rgba.into_raw()),
    };

    Ok(Photo { id, width, height, rgba })
}

/// Resolves a catalog id to a decoded photo. Called on loader workers.
pub trait AssetSource: Send + Sync + 'static {
    fn load(&self, id: CatalogId) -> Result<Photo, AssetError>;
}

/// Photos served over HTTP as `{base}{id}.{extension}`.
pub struct HttpSource {
    client: Client,
    base: Url,
    extension: String,
    max_width: Option<u32>,
}

impl HttpSource {
    pub fn new(base_url: &str, extension: &str, max_width: Option<u32>) -> Result<Self, TunnelError> {
        let base = parse_base_url(base_url).map_err(|source| TunnelError::BaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            client: build_client()?,
            base,
            extension: extension.to_string(),
            max_width,
        })
    }

    /// Full URL of a photo, for display next to the full-resolution view.
    pub fn url_for(&self, id: CatalogId) -> Result<Url, AssetError> {
        photo_url(&self.base, id, &self.extension)
    }
}

impl AssetSource for HttpSource {
    fn load(&self, id: CatalogId) -> Result<Photo, AssetError> {
        let url = self.url_for(id)?;
        let bytes = fetch_bytes(&self.client, &url, id)?;
        decode_photo(id, &bytes, self.max_width)
    }
}

/// Outcome of one background load.
#[derive(Debug)]
pub struct LoadEvent {
    pub id: CatalogId,
    pub result: Result<Photo, AssetError>,
}

/// Called from a worker after each load settles (e.g. to request a repaint).
pub type LoadNotify = Arc<dyn Fn() + Send + Sync>;

/// Manages background photo fetching and decoding.
pub struct PhotoLoader {
    source: Arc<dyn AssetSource>,
    pool: rayon::ThreadPool,
    tx: mpsc::Sender<LoadEvent>,
    rx: mpsc::Receiver<LoadEvent>,
    requested: HashSet<CatalogId>,
    in_flight: usize,
    notify: Option<LoadNotify>,
}

impl PhotoLoader {
    pub fn new(source: Arc<dyn AssetSource>, workers: usize) -> Result<Self, TunnelError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("photo-loader-{}", i))
            .build()?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            source,
            pool,
            tx,
            rx,
            requested: HashSet::new(),
            in_flight: 0,
            notify: None,
        })
    }

    /// Install a hook run on the worker after each load settles.
    pub fn with_notify(mut self, notify: LoadNotify) -> Self {
        self.notify = Some(notify);
        self
    }

    /// Request a photo to be loaded in the background. Each id is requested
    /// at most once per loader; repeats are ignored.
    pub fn request(&mut self, id: CatalogId) {
        if !self.requested.insert(id) {
            return;
        }

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let notify = self.notify.clone();
        self.pool.spawn(move || {
            let result = source.load(id);
            let _ = tx.send(LoadEvent { id, result });
            if let Some(notify) = notify {
                notify();
            }
        });
        self.in_flight += 1;
    }

    /// Drain every completed load without blocking. Call every frame.
    pub fn poll(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        self.in_flight -= events.len().min(self.in_flight);
        events
    }

    /// Block until the next load settles or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> Option<LoadEvent> {
        if self.in_flight == 0 {
            return None;
        }
        let event = self.rx.recv_timeout(timeout).ok()?;
        self.in_flight -= 1;
        Some(event)
    }

    /// Number of photos requested but not yet handed back.
    pub fn pending_count(&self) -> usize {
        self.in_flight
    }

    pub fn requested_count(&self) -> usize {
        self.requested.len()
    }
}
