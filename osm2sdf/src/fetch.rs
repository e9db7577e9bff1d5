//! Grabs an OSM extract for a bounding box from the public API. This must be called with a
//! tokio runtime somewhere; the caller decides where the result gets cached.

use anyhow::{Context, Result};

use geom::GPSBounds;

const API_URL: &str = "https://api.openstreetmap.org/api/0.6/map";

/// Downloads the raw OSM XML covering `bounds`. The API caps how much area one request may
/// cover; a failure here usually means the bounding box is too big for it.
pub async fn download_osm(bounds: &GPSBounds) -> Result<String> {
    let url = format!(
        "{}?bbox={},{},{},{}",
        API_URL, bounds.min_lon, bounds.min_lat, bounds.max_lon, bounds.max_lat
    );
    info!("Downloading {}", url);
    let resp = reqwest::get(&url)
        .await
        .and_then(|resp| resp.error_for_status())
        .with_context(|| format!("downloading {}", url))?;
    let raw = resp
        .text()
        .await
        .with_context(|| format!("reading the response from {}", url))?;
    Ok(raw)
}
