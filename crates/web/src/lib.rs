use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod common;
pub mod config;
pub mod state;
pub mod ws;

pub use common::RouteResult;
pub use config::WebConfig;
pub use state::WebState;

pub async fn start_web_server(config: &WebConfig, state: WebState) -> std::io::Result<()> {
    let routes = Router::new()
        .nest("/api", api::router())
        .nest("/ws", ws::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = TcpListener::bind(config.bind_addr.as_str()).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}
