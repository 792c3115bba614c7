use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::engine::catalog::CatalogId;
use crate::error::AssetError;

/// Per-request timeout for photo downloads
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Build the shared blocking client used by every loader worker.
pub fn build_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("photo-tunnel/", env!("CARGO_PKG_VERSION")))
        .timeout(FETCH_TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

/// Parse the catalog base URL, making sure it ends in `/` so ids join as
/// children rather than replacing the last path segment.
pub fn parse_base_url(base: &str) -> Result<Url, url::ParseError> {
    if base.ends_with('/') {
        Url::parse(base)
    } else {
        Url::parse(&format!("{}/", base))
    }
}

/// `{base}{id}.{extension}`
pub fn photo_url(base: &Url, id: CatalogId, extension: &str) -> Result<Url, AssetError> {
    base.join(&format!("{}.{}", id, extension))
        .map_err(|source| AssetError::Url { id, source })
}

/// Download the raw bytes of one photo.
pub fn fetch_bytes(client: &Client, url: &Url, id: CatalogId) -> Result<Vec<u8>, AssetError> {
    let response = client
        .get(url.as_str())
        .header("Accept", "image/webp,image/*;q=0.8,*/*;q=0.5")
        .send()
        .map_err(|source| AssetError::Http { id, source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(AssetError::Status {
            id,
            status: status.as_u16(),
        });
    }

    let bytes = response
        .bytes()
        .map_err(|source| AssetError::Http { id, source })?;
    Ok(bytes.to_vec())
}
