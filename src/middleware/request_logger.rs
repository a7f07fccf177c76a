//! Request logging middleware.
//!
//! Download requests are logged with the exam they ask for and how the lookup
//! ended; everything else gets the plain method/path/query line.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::StatusCode;
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::time::Instant;
use tracing::{error, info, warn};

use crate::models::DownloadQuery;

const DOWNLOAD_SUFFIX: &str = "/download";

/// What a request is after, captured before it is handed on.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RequestTarget {
    /// A PDF lookup, with its raw (unvalidated) parameters.
    Exam(DownloadQuery),
    /// Anything else; `query` is percent-decoded.
    Other { query: String },
}

impl RequestTarget {
    fn classify(method: &str, path: &str, raw_query: &str) -> Self {
        if method != "OPTIONS" && path.trim_end_matches('/').ends_with(DOWNLOAD_SUFFIX) {
            return RequestTarget::Exam(DownloadQuery::from_query_string(raw_query));
        }

        let query = urlencoding::decode(raw_query)
            .map(|q| q.into_owned())
            .unwrap_or_else(|_| raw_query.to_string());
        RequestTarget::Other { query }
    }
}

/// How a download ended, judged from the response status.
fn lookup_outcome(status: StatusCode) -> &'static str {
    match status.as_u16() {
        200..=299 => "resolved",
        400 => "rejected",
        404 => "no candidate matched",
        500..=599 => "storage unavailable",
        _ => "unexpected status",
    }
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

/// Request logger middleware factory.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let target = RequestTarget::classify(&method, &path, req.query_string());
        let remote_addr = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();

        match &target {
            RequestTarget::Exam(exam) => info!(
                target: "api",
                method = %method,
                year = %field(&exam.year),
                month = %field(&exam.month),
                grade = %field(&exam.grade),
                subject = %field(&exam.subject),
                doc_type = %field(&exam.doc_type),
                remote_addr = %remote_addr,
                "→ PDF lookup requested"
            ),
            RequestTarget::Other { query } => info!(
                target: "api",
                method = %method,
                path = %path,
                query = %query,
                remote_addr = %remote_addr,
                "→ Request started"
            ),
        }

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let duration_ms = start.elapsed().as_millis();
            let status = res.status();

            match target {
                RequestTarget::Exam(exam) => {
                    let outcome = lookup_outcome(status);
                    let subject = field(&exam.subject);
                    if status.is_server_error() {
                        error!(
                            target: "api",
                            status = %status.as_u16(),
                            subject = %subject,
                            duration_ms = %duration_ms,
                            outcome,
                            "← PDF lookup failed"
                        );
                    } else if status.is_success() {
                        info!(
                            target: "api",
                            status = %status.as_u16(),
                            subject = %subject,
                            duration_ms = %duration_ms,
                            outcome,
                            "← PDF lookup finished"
                        );
                    } else {
                        warn!(
                            target: "api",
                            status = %status.as_u16(),
                            subject = %subject,
                            duration_ms = %duration_ms,
                            outcome,
                            "← PDF lookup finished"
                        );
                    }
                }
                RequestTarget::Other { .. } => {
                    if status.is_success() {
                        info!(
                            target: "api",
                            method = %method,
                            path = %path,
                            status = %status.as_u16(),
                            duration_ms = %duration_ms,
                            "← Request completed"
                        );
                    } else {
                        warn!(
                            target: "api",
                            method = %method,
                            path = %path,
                            status = %status.as_u16(),
                            duration_ms = %duration_ms,
                            "← Request failed"
                        );
                    }
                }
            }

            Ok(res)
        })
    }
}
