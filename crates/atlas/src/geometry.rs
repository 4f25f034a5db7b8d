use std::time::Duration;

use serde::Deserialize;

/// Minimum spacing between outbound requests, to stay within the public
/// router's rate limit.
pub const REQUEST_PACING: Duration = Duration::from_millis(300);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

pub struct GeometryFetcher {
    http: reqwest::Client,
    base_url: String,
}

impl GeometryFetcher {
    pub fn new(base_url: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client configuration is valid");
        Self { http, base_url }
    }

    /// Requests a street-following polyline through `waypoints` (lat, lon).
    /// Returns `None` on any failure — callers fall back to the
    /// stop-to-stop straight line and record `has_osrm_geometry = false`.
    pub async fn fetch_polyline(&self, waypoints: &[(f64, f64)]) -> Option<Vec<(f64, f64)>> {
        if waypoints.len() < 2 {
            return None;
        }
        let coords = waypoints
            .iter()
            .map(|(lat, lon)| format!("{lon},{lat}"))
            .collect::<Vec<_>>()
            .join(";");
        let url = format!(
            "{}/route/v1/driving/{}?overview=full&geometries=geojson",
            self.base_url, coords
        );

        match self.http.get(&url).send().await {
            Ok(response) => match response.error_for_status() {
                Ok(response) => match response.json::<OsrmResponse>().await {
                    Ok(parsed) => parsed
                        .routes
                        .into_iter()
                        .next()
                        .map(|route| {
                            route
                                .geometry
                                .coordinates
                                .into_iter()
                                .map(|[lon, lat]| (lat, lon))
                                .collect()
                        }),
                    Err(err) => {
                        tracing::warn!(%err, "could not parse osrm response");
                        None
                    }
                },
                Err(err) => {
                    tracing::warn!(%err, "osrm request returned an error status");
                    None
                }
            },
            Err(err) => {
                tracing::warn!(%err, "osrm request failed");
                None
            }
        }
    }
}
