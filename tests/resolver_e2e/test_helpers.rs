//! Shared test helpers for resolver E2E tests.

use actix_web::{App, dev::ServiceResponse, test, web};
use exam_pdf_lib::api;
use exam_pdf_lib::config::default_templates;
use exam_pdf_lib::services::{PdfResolver, ResolutionStrategy, ResolverSettings};
use serde_json::Value;
use std::time::Duration;

/// Descriptor query used across tests: 2023, March, grade 3, Korean.
pub const EXAM_QUERY: &str = "year=2023&month=3&grade=3&subject=%EA%B5%AD%EC%96%B4";

/// Candidate #2 for [`EXAM_QUERY`].
pub const SECOND_CANDIDATE: &str = "2023년-3월-고3-모의고사-국어-문제.pdf";

/// Candidate #1 for [`EXAM_QUERY`].
pub const FIRST_CANDIDATE: &str = "2023년-고3-3월-모의고사-국어-문제.pdf";

/// Resolver settings with the built-in templates pointed at `base_url`.
pub fn test_settings(base_url: &str, strategy: ResolutionStrategy) -> ResolverSettings {
    ResolverSettings {
        base_url: base_url.to_string(),
        templates: default_templates(),
        default_doc_type: "문제".to_string(),
        strategy,
        max_concurrent_fetches: 12,
    }
}

/// Build a resolver with short timeouts for tests.
pub fn test_resolver(settings: ResolverSettings) -> PdfResolver {
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(2))
        .timeout(Duration::from_secs(10))
        .build()
        .expect("failed to build test client");
    PdfResolver::with_client(settings, client)
}

/// The rendered candidates for [`EXAM_QUERY`], in template order.
pub fn exam_candidates(doc_type: &str) -> Vec<String> {
    let resolver = test_resolver(test_settings("http://unused/", ResolutionStrategy::Sequential));
    resolver.candidates(&exam_pdf_lib::models::ExamDescriptor {
        year: "2023".to_string(),
        month: "3".to_string(),
        grade: "3".to_string(),
        subject: "국어".to_string(),
        doc_type: doc_type.to_string(),
    })
}

/// Create a test app wired like the server binary.
pub async fn create_test_app(
    resolver: PdfResolver,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .wrap(api::cors_headers())
            .app_data(web::Data::new(resolver))
            .service(web::scope("/api").configure(api::configure_routes)),
    )
    .await
}

/// GET `/api/download?{query}` and return status and JSON body.
pub async fn get_download<S>(app: &S, query: &str) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::get()
        .uri(&format!("/api/download?{}", query))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// Assert the three CORS headers on a response.
pub fn assert_cors_headers(resp: &ServiceResponse) {
    let header = |name: &str| {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    assert_eq!(header("access-control-allow-origin").as_deref(), Some("*"));
    assert_eq!(
        header("access-control-allow-methods").as_deref(),
        Some("GET, POST, OPTIONS")
    );
    assert_eq!(
        header("access-control-allow-headers").as_deref(),
        Some("Content-Type")
    );
}
