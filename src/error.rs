use thiserror::Error;

use crate::engine::catalog::CatalogId;

/// Failure to turn one catalog id into a decoded photo.
///
/// Every variant carries the id so the catalog can exclude it for the rest
/// of the session.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("invalid URL for photo {id}: {source}")]
    Url {
        id: CatalogId,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP error for photo {id}: {source}")]
    Http {
        id: CatalogId,
        #[source]
        source: reqwest::Error,
    },

    #[error("photo {id} returned status {status}")]
    Status { id: CatalogId, status: u16 },

    #[error("failed to decode photo {id}: {source}")]
    Decode {
        id: CatalogId,
        #[source]
        source: image::ImageError,
    },

    #[error("photo {id} has empty dimensions")]
    Empty { id: CatalogId },

}

impl AssetError {
    #[must_use]
    pub fn id(&self) -> CatalogId {
        match self {
            Self::Url { id, .. }
            | Self::Http { id, .. }
            | Self::Status { id, .. }
            | Self::Decode { id, .. }
            | Self::Empty { id } => *id,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("catalog range is empty: min id {min} > max id {max}")]
    EmptyRange { min: CatalogId, max: CatalogId },

    #[error("spawn grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },

    #[error("photo margin must be positive, got {0}")]
    NonPositiveMargin(f64),

    #[error("lookahead distance must not be negative, got {0}")]
    NegativeLookahead(f64),

    #[error("observer step must be positive, got {0}")]
    NonPositiveStep(f64),

    #[error("startup gate of {gate} photos exceeds catalog of {catalog}")]
    GateTooLarge { gate: usize, catalog: usize },

    #[error("loader needs at least one worker")]
    NoWorkers,
}

#[derive(Debug, Error)]
pub enum TunnelError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid base URL {url}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("loader pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("timed out waiting for photos: {available} of {required} loaded")]
    GateTimeout { available: usize, required: usize },

    #[error("startup gate unreachable: every load settled with {available} of {required} loaded")]
    GateUnreachable { available: usize, required: usize },
}
