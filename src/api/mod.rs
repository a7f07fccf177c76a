//! API endpoint modules.

pub mod download;
pub mod health;
pub mod openapi;

use actix_web::middleware::DefaultHeaders;
use actix_web::web;

pub use download::configure_routes as configure_download_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;

/// CORS headers attached to every response, including errors and preflights.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "Content-Type"))
}

/// Configure every route under the `/api` scope.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(configure_download_routes);
}
