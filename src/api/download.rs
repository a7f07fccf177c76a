//! PDF download endpoint.
//!
//! Resolves an exam descriptor to a PDF on the storage host and returns it
//! base64-encoded.

use actix_web::http::Method;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::error::AppResult;
use crate::models::{DownloadQuery, DownloadResponse};
use crate::services::PdfResolver;

/// Download an exam PDF.
///
/// Tries the configured filename conventions for the exam and returns the
/// first file the storage host serves.
#[utoipa::path(
    get,
    path = "/api/download",
    tag = "Download",
    params(DownloadQuery),
    responses(
        (status = 200, description = "PDF found", body = DownloadResponse),
        (status = 400, description = "Missing required parameter", body = crate::error::MissingParametersResponse),
        (status = 404, description = "No candidate filename matched", body = crate::error::NotFoundResponse),
        (status = 500, description = "Storage host unreachable", body = crate::error::ErrorResponse),
    )
)]
pub async fn download(
    req: HttpRequest,
    resolver: web::Data<PdfResolver>,
) -> AppResult<HttpResponse> {
    // Parsed by hand so repeated or malformed keys still get the JSON 400
    let exam = DownloadQuery::from_query_string(req.query_string())
        .into_descriptor(&resolver.settings().default_doc_type)?;

    let pdf = resolver.resolve(&exam).await?;

    Ok(HttpResponse::Ok().json(DownloadResponse::from(pdf)))
}

/// CORS preflight. Headers come from the app-wide CORS middleware.
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Configure download routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // POST reads the same query string as GET
    cfg.service(
        web::resource("/download")
            .route(web::get().to(download))
            .route(web::post().to(download))
            .route(web::method(Method::OPTIONS).to(preflight)),
    );
}
