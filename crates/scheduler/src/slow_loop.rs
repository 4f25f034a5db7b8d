use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use atlas::{index, GeometryFetcher, RouteIndex};
use source::SourceClient;

use crate::job::{Continuation, Job};

/// Refetches routes and points and rebuilds the route atlas from scratch,
/// then installs it atomically. Runs far less often than the fast loop
/// since it drives a paced sequence of routing requests per route.
pub struct SlowLoop {
    source: Arc<SourceClient>,
    geometry: Arc<GeometryFetcher>,
    route_index: Arc<RouteIndex>,
    interval: Duration,
}

impl SlowLoop {
    pub fn new(
        source: Arc<SourceClient>,
        geometry: Arc<GeometryFetcher>,
        route_index: Arc<RouteIndex>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            geometry,
            route_index,
            interval,
        }
    }
}

#[async_trait]
impl Job for SlowLoop {
    async fn tick(&mut self) -> Continuation {
        let routes = self.source.fetch_routes().await;
        let points = self.source.fetch_points().await;

        match (routes, points) {
            (Ok(routes), Ok(points)) => {
                let catalog = index::build_catalog(&routes, &points, &self.geometry).await;
                let route_count = catalog.routes.len();
                self.route_index.publish(catalog);
                tracing::info!(route_count, "route atlas refreshed");
            }
            (routes_result, points_result) => {
                if let Err(err) = routes_result {
                    tracing::error!(%err, "could not refresh routes, keeping previous atlas");
                }
                if let Err(err) = points_result {
                    tracing::error!(%err, "could not refresh points, keeping previous atlas");
                }
            }
        }

        Continuation::Continue
    }

    fn interval(&self) -> Duration {
        self.interval
    }
}
