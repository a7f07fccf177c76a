//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Exam PDF Resolver",
        version = "0.4.0",
        description = "Resolves mock-exam PDFs on the storage host by filename convention and returns them base64-encoded"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::info,
        // Download endpoint
        api::download::download,
    ),
    components(
        schemas(
            // Errors
            error::ErrorResponse,
            error::MissingParametersResponse,
            error::NotFoundResponse,
            // Health
            api::health::HealthResponse,
            api::health::ServerInfoResponse,
            // Download
            models::DownloadResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Download", description = "Exam PDF resolution")
    )
)]
pub struct ApiDoc;
