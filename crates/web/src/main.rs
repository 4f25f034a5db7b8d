use std::sync::Arc;

use atlas::{index, AtlasConfig, GeometryFetcher, RouteIndex};
use broadcast::{Broadcaster, BroadcastConfig};
use pipeline::{PipelineConfig, VehicleTracker};
use scheduler::{FastLoop, SchedulerConfig, SlowLoop};
use source::{SourceClient, SourceConfig};
use web::{start_web_server, WebConfig, WebState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let source_config = SourceConfig::from_env();
    let atlas_config = AtlasConfig::from_env();
    let pipeline_config = PipelineConfig::from_env();
    let broadcast_config = BroadcastConfig::from_env();
    let scheduler_config = SchedulerConfig::from_env();
    let web_config = WebConfig::from_env();

    let source = Arc::new(SourceClient::new(source_config));
    let geometry = Arc::new(GeometryFetcher::new(atlas_config.osrm_base_url.clone()));

    tracing::info!("building initial route atlas");
    let initial_catalog = match (source.fetch_routes().await, source.fetch_points().await) {
        (Ok(routes), Ok(points)) => index::build_catalog(&routes, &points, &geometry).await,
        (routes_result, points_result) => {
            if let Err(err) = routes_result {
                tracing::error!(%err, "could not fetch routes for initial route atlas, starting empty");
            }
            if let Err(err) = points_result {
                tracing::error!(%err, "could not fetch points for initial route atlas, starting empty");
            }
            index::build_catalog(&[], &[], &geometry).await
        }
    };
    tracing::info!(route_count = initial_catalog.routes.len(), "initial route atlas built");

    let route_index = Arc::new(RouteIndex::new(initial_catalog));
    let tracker = actors::run(move || VehicleTracker::new(pipeline_config.clone()));
    let broadcaster = Arc::new(Broadcaster::new(&broadcast_config));

    tokio::spawn(scheduler::run(FastLoop::new(
        source.clone(),
        route_index.clone(),
        tracker.clone(),
        broadcaster.clone(),
        scheduler_config.poll_interval(),
    )));
    tokio::spawn(scheduler::run(SlowLoop::new(
        source.clone(),
        geometry.clone(),
        route_index.clone(),
        scheduler_config.route_refresh_interval(),
    )));

    let state = WebState {
        route_index,
        tracker,
        broadcaster,
    };

    start_web_server(&web_config, state)
        .await
        .expect("web server exited unexpectedly");
}
