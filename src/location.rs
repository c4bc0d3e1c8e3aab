use crate::geo::Coordinate;
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::sync::mpsc::{Receiver, channel};
use std::time::Duration;

/// Knobs for the one-shot lookup.
#[derive(Debug, Clone, Copy)]
pub struct LocationSettings {
    /// Request the best position the provider can give. IP geolocation has
    /// a single precision, so this is carried and logged but changes
    /// nothing there.
    pub high_accuracy: bool,
    /// Give up after this long.
    pub timeout: Duration,
    /// Maximum acceptable age of a cached position. Zero forces a fresh
    /// answer.
    pub max_cached_age: Duration,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(15),
            max_cached_age: Duration::ZERO,
        }
    }
}

const ENDPOINT: &str = "https://ipapi.co/json/";

#[derive(Debug, Deserialize)]
struct GeoIpResponse {
    latitude: f64,
    longitude: f64,
}

impl GeoIpResponse {
    /// Answers outside the valid degree ranges count as lookup failures.
    fn into_coordinate(self) -> Result<Coordinate> {
        let coord = Coordinate::new(self.latitude, self.longitude);
        ensure!(
            coord.is_valid(),
            "location service returned out-of-range coordinates"
        );
        Ok(coord)
    }
}

/// Spawn the single location request for this session and hand back the
/// channel it reports on. Exactly one message arrives: `Some(coordinate)`
/// on success, `None` on any failure. A dropped sender reads as failure
/// too, so the receiver can always settle.
pub fn spawn_lookup(settings: LocationSettings) -> Receiver<Option<Coordinate>> {
    let (tx, rx) = channel();
    tokio::spawn(async move {
        let located = match lookup(settings).await {
            Ok(coord) => {
                tracing::info!(
                    lat = coord.lat_deg,
                    lng = coord.lng_deg,
                    "viewer location acquired"
                );
                Some(coord)
            }
            Err(err) => {
                tracing::info!("viewer location unavailable: {err:#}");
                None
            }
        };
        let _ = tx.send(located);
    });
    rx
}

async fn lookup(settings: LocationSettings) -> Result<Coordinate> {
    tracing::debug!(
        high_accuracy = settings.high_accuracy,
        timeout_ms = settings.timeout.as_millis() as u64,
        "requesting viewer location"
    );
    let client = reqwest::Client::builder()
        .timeout(settings.timeout)
        .build()
        .context("building http client")?;

    let mut request = client.get(ENDPOINT);
    if settings.max_cached_age.is_zero() {
        request = request.header(reqwest::header::CACHE_CONTROL, "no-cache");
    }

    let response: GeoIpResponse = request
        .send()
        .await
        .context("location request failed")?
        .error_for_status()
        .context("location service rejected the request")?
        .json()
        .await
        .context("malformed location response")?;

    response.into_coordinate()
}
