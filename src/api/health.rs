//! Health check endpoints.

use actix_web::{HttpResponse, get, web};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::PdfResolver;

/// Health check response.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

/// Server info response.
#[derive(Serialize, ToSchema)]
pub struct ServerInfoResponse {
    version: &'static str,
    strategy: &'static str,
    template_count: usize,
    storage_base_url: String,
}

/// Health check endpoint.
///
/// Returns 200 if the service is running. Does not contact the storage host.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Resolver configuration as seen by this instance.
#[utoipa::path(
    get,
    path = "/api/info",
    tag = "Health",
    responses(
        (status = 200, description = "Server info", body = ServerInfoResponse)
    )
)]
#[get("/info")]
pub async fn info(resolver: web::Data<PdfResolver>) -> HttpResponse {
    let settings = resolver.settings();
    HttpResponse::Ok().json(ServerInfoResponse {
        version: env!("CARGO_PKG_VERSION"),
        strategy: settings.strategy.as_str(),
        template_count: settings.templates.len(),
        storage_base_url: settings.base_url.clone(),
    })
}

/// Configure health routes.
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(info);
}
