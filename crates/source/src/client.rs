use std::time::Duration;

use chrono::{DateTime, Utc};
use model::{RawVehicle, Route, Stop};
use serde::Deserialize;

use crate::{config::SourceConfig, error::SourceError};

const MAX_ATTEMPTS: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Deserialize)]
struct BoardDto {
    id: String,
    board_num: String,
    route: String,
    lat: f64,
    lon: f64,
    speed: f64,
    course: f64,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RouteElementDto {
    direction: u8,
    path: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct RouteDto {
    id: i64,
    number: String,
    name: String,
    #[serde(default)]
    color: Option<String>,
    elements: Vec<RouteElementDto>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct PointDto {
    ID: i64,
    NAME: String,
    LAT: f64,
    LON: f64,
    STATUS: String,
    DIRECTION: String,
}

/// Fetches vehicles, routes, and points from the upstream transit API.
/// Transient failures (network, timeouts, 5xx) are retried with exponential
/// backoff before surfacing; malformed payloads and 4xx responses are
/// returned immediately as fatal.
pub struct SourceClient {
    http: reqwest::Client,
    config: SourceConfig,
}

impl SourceClient {
    pub fn new(config: SourceConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client configuration is valid");
        Self { http, config }
    }

    pub async fn fetch_vehicles(&self) -> Result<Vec<RawVehicle>, SourceError> {
        let boards: Vec<BoardDto> = self
            .get_with_retry("/api/v2/tram/boards/")
            .await?;
        Ok(boards
            .into_iter()
            .map(|board| RawVehicle {
                device_id: board.id,
                board_num: board.board_num,
                route_number: board.route,
                latitude: board.lat,
                longitude: board.lon,
                speed_kmh: board.speed,
                course_deg: board.course,
                timestamp: board.timestamp,
            })
            .collect())
    }

    pub async fn fetch_routes(&self) -> Result<Vec<Route>, SourceError> {
        let routes: Vec<RouteDto> = self.get_with_retry("/api/v2/tram/routes/").await?;
        routes
            .into_iter()
            .map(|route| {
                let forward_path = route
                    .elements
                    .iter()
                    .find(|element| element.direction == 0)
                    .map(|element| element.path.clone())
                    .unwrap_or_default();
                let reverse_path = route
                    .elements
                    .iter()
                    .find(|element| element.direction == 1)
                    .map(|element| element.path.clone())
                    .unwrap_or_default();
                Ok(Route {
                    id: route.id,
                    number: route.number,
                    name: route.name,
                    color: route.color,
                    forward_path,
                    reverse_path,
                })
            })
            .collect()
    }

    pub async fn fetch_points(&self) -> Result<Vec<Stop>, SourceError> {
        let points: Vec<PointDto> = self.get_with_retry("/api/v2/tram/points/").await?;
        Ok(points
            .into_iter()
            .map(|point| Stop {
                id: point.ID,
                name: point.NAME,
                latitude: point.LAT,
                longitude: point.LON,
                direction: point.DIRECTION,
                is_live: point.STATUS.eq_ignore_ascii_case("active"),
            })
            .collect())
    }

    async fn get_with_retry<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
    ) -> Result<T, SourceError> {
        let url = format!("{}{}", self.config.base_url, path);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.get_once(&url).await {
                Ok(value) => return Ok(value),
                Err(SourceError::Transient(message)) if attempt < MAX_ATTEMPTS => {
                    let backoff = Duration::from_millis(200 * 2u64.pow(attempt - 1));
                    tracing::warn!(attempt, %message, "transient source fetch failure, retrying");
                    tokio::time::sleep(backoff).await;
                }
                Err(other) => return Err(other),
            }
        }
    }

    async fn get_once<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, SourceError> {
        let response = self
            .http
            .get(url)
            .query(&[("apiKey", self.config.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;
        response
            .json::<T>()
            .await
            .map_err(|err| SourceError::Fatal(err.to_string()))
    }
}
