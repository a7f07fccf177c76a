//! E2E tests: download client against a live resolver server.

use actix_web::{App, HttpServer, web};
use exam_pdf_lib::api;
use exam_pdf_lib::client::{ClientError, DownloadClient, ExamRequest};
use exam_pdf_lib::services::ResolutionStrategy;
use std::net::TcpListener;

use super::mock_storage::{MockFile, MockStorage};
use super::test_helpers::*;

/// Start the resolver API on an ephemeral port; returns the download URL.
async fn start_resolver_server(storage_base_url: &str) -> String {
    let resolver = web::Data::new(test_resolver(test_settings(
        storage_base_url,
        ResolutionStrategy::Concurrent,
    )));

    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let port = listener.local_addr().unwrap().port();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(api::cors_headers())
            .app_data(resolver.clone())
            .service(web::scope("/api").configure(api::configure_routes))
    })
    .workers(1)
    .listen(listener)
    .expect("failed to listen")
    .disable_signals()
    .run();

    tokio::spawn(server);

    format!("http://127.0.0.1:{}/api/download", port)
}

fn korean_exam() -> ExamRequest {
    ExamRequest {
        year: "2023".to_string(),
        month: "3".to_string(),
        grade: "3".to_string(),
        subject: "국어".to_string(),
        doc_type: "문제".to_string(),
    }
}

/// The client decodes the payload and writes it under the output directory.
#[actix_rt::test]
async fn test_client_saves_resolved_pdf() {
    let body = b"%PDF-1.4 client round trip";
    let mock = MockStorage::start(vec![(SECOND_CANDIDATE, MockFile::pdf(body))]).await;
    let api_url = start_resolver_server(&mock.base_url).await;

    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("nested");
    let client = DownloadClient::new(api_url).unwrap();

    let (path, size) = client.download_to(&korean_exam(), &target).await.unwrap();

    assert_eq!(path, target.join(SECOND_CANDIDATE));
    assert_eq!(size, body.len());
    assert_eq!(std::fs::read(&path).unwrap(), body);
}

/// A 404 from the endpoint maps to `ClientError::NotFound`.
#[actix_rt::test]
async fn test_client_not_found() {
    let mock = MockStorage::start(vec![]).await;
    let api_url = start_resolver_server(&mock.base_url).await;

    let client = DownloadClient::new(api_url).unwrap();
    let result = client.fetch(&korean_exam()).await;

    assert!(matches!(result, Err(ClientError::NotFound)));
}

/// A 400 surfaces the status and the server's explanation.
#[actix_rt::test]
async fn test_client_reports_bad_request() {
    let mock = MockStorage::start(vec![]).await;
    let api_url = start_resolver_server(&mock.base_url).await;

    let client = DownloadClient::new(api_url).unwrap();
    let exam = ExamRequest {
        subject: String::new(),
        ..korean_exam()
    };

    match client.fetch(&exam).await {
        Err(ClientError::Status { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("year, month, grade, subject"));
        }
        other => panic!("expected 400, got {:?}", other.map(|pdf| pdf.file_name)),
    }
}
