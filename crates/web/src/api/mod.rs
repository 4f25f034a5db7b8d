use axum::{routing::on, Router};

pub mod diagnostics;
pub mod health;
pub mod routes;
pub mod stops;
pub mod vehicles;

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    state::WebState,
};

pub fn router() -> Router<WebState> {
    Router::new()
        .nest("/routes", routes::routes())
        .nest("/stops", stops::routes())
        .nest("/vehicles", vehicles::routes())
        .nest("/diagnostics", diagnostics::routes())
        .nest("/health", health::routes())
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}
