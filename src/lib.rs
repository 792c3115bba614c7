//! Endless photo tunnel.
//!
//! An observer flies forward through a field of photo panels drawn from a
//! finite catalog. Photos load in the background; the engine keeps a window
//! of panels ahead of the observer, places new ones deeper than the rest
//! and recycles the ones the observer has passed.

pub mod config;
pub mod engine;
pub mod error;
pub mod net;
pub mod render;

pub use config::TunnelConfig;
pub use engine::catalog::{AssetCatalog, CatalogId, CatalogRange};
pub use engine::session::{Phase, Session, SessionStats};
pub use error::{AssetError, ConfigError, TunnelError};
pub use render::{RenderSurface, SurfaceHandle};
