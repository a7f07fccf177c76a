//! Candidate-filename resolution against the remote storage host.
//!
//! The storage host has no listing API, so the resolver renders every known
//! filename convention for an exam and fetches until one answers with a
//! success status.

use std::pin::pin;
use std::sync::Arc;

use futures_util::{StreamExt, stream};
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::config::FetchSettings;
use crate::error::{AppError, AppResult};
use crate::models::{ExamDescriptor, FetchedPdf, FilenameTemplate};

/// Message of the aggregate 404 returned by the concurrent strategy.
pub const NO_PATTERN_MATCHED: &str = "일치하는 파일명 패턴이 없습니다";

/// How candidates are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// Only the first template.
    Single,
    /// Templates in order, one at a time.
    Sequential,
    /// All templates at once (bounded); first success wins.
    Concurrent,
}

impl ResolutionStrategy {
    /// Parse strategy from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "single" => Some(Self::Single),
            "sequential" => Some(Self::Sequential),
            "concurrent" | "parallel" => Some(Self::Concurrent),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Sequential => "sequential",
            Self::Concurrent => "concurrent",
        }
    }
}

impl std::fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the resolver needs besides the HTTP client.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Storage URL prefix, ending in `/`.
    pub base_url: String,
    /// Filename conventions, in priority order.
    pub templates: Vec<FilenameTemplate>,
    /// Document type used when the request does not name one.
    pub default_doc_type: String,
    pub strategy: ResolutionStrategy,
    /// Upper bound on in-flight fetches for [`ResolutionStrategy::Concurrent`].
    pub max_concurrent_fetches: usize,
}

/// Result of fetching one candidate.
#[derive(Debug)]
pub enum FetchOutcome {
    /// 2xx, body read.
    Found(FetchedPdf),
    /// 4xx: the storage host says the file is not there.
    Absent(StatusCode),
    /// Any other non-success status: the storage host itself failed.
    UpstreamError(StatusCode),
}

/// Resolves exam descriptors to PDFs on the storage host.
#[derive(Clone)]
pub struct PdfResolver {
    client: reqwest::Client,
    settings: Arc<ResolverSettings>,
}

impl PdfResolver {
    /// Create a resolver with its own HTTP client built from `fetch`.
    pub fn new(settings: ResolverSettings, fetch: &FetchSettings) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(fetch.connect_timeout)
            .timeout(fetch.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(settings, client))
    }

    /// Create a resolver around an existing client.
    pub fn with_client(settings: ResolverSettings, client: reqwest::Client) -> Self {
        Self {
            client,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Render every template for `exam`, in template order.
    pub fn candidates(&self, exam: &ExamDescriptor) -> Vec<String> {
        self.settings
            .templates
            .iter()
            .map(|template| template.render(exam))
            .collect()
    }

    /// Full upstream URL for a candidate filename.
    pub fn candidate_url(&self, file_name: &str) -> String {
        format!("{}{}", self.settings.base_url, urlencoding::encode(file_name))
    }

    /// Fetch one candidate.
    ///
    /// Non-success statuses are outcomes, not errors; only transport failures
    /// (DNS, connection reset, timeout) are returned as `Err`.
    pub async fn fetch_candidate(&self, file_name: &str) -> Result<FetchOutcome, reqwest::Error> {
        let url = self.candidate_url(file_name);
        info!(url = %url, "Fetching candidate PDF");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            return Ok(FetchOutcome::Found(FetchedPdf {
                file_name: file_name.to_string(),
                bytes: bytes.to_vec(),
            }));
        }

        if status.is_client_error() {
            debug!(file_name = %file_name, status = %status.as_u16(), "Candidate absent");
            Ok(FetchOutcome::Absent(status))
        } else {
            warn!(
                file_name = %file_name,
                status = %status.as_u16(),
                "Storage host returned a server error"
            );
            Ok(FetchOutcome::UpstreamError(status))
        }
    }

    /// Resolve `exam` using the configured strategy.
    pub async fn resolve(&self, exam: &ExamDescriptor) -> AppResult<FetchedPdf> {
        let candidates = self.candidates(exam);

        let result = match self.settings.strategy {
            ResolutionStrategy::Single => self.resolve_single(candidates).await,
            ResolutionStrategy::Sequential => self.resolve_sequential(candidates).await,
            ResolutionStrategy::Concurrent => self.resolve_concurrent(candidates).await,
        };

        match &result {
            Ok(pdf) => info!(
                exam = %exam,
                file_name = %pdf.file_name,
                size = pdf.bytes.len(),
                "Resolved exam PDF"
            ),
            Err(e) => info!(exam = %exam, error = %e, "Exam PDF not resolved"),
        }

        result
    }

    async fn resolve_single(&self, candidates: Vec<String>) -> AppResult<FetchedPdf> {
        let file_name = candidates
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal("No filename templates configured".to_string()))?;

        match self.fetch_candidate(&file_name).await? {
            FetchOutcome::Found(pdf) => Ok(pdf),
            FetchOutcome::Absent(status) | FetchOutcome::UpstreamError(status) => {
                Err(AppError::NotFound {
                    message: Some(format!(
                        "{} (HTTP {})",
                        self.candidate_url(&file_name),
                        status.as_u16()
                    )),
                    tried: Some(vec![file_name]),
                })
            }
        }
    }

    async fn resolve_sequential(&self, candidates: Vec<String>) -> AppResult<FetchedPdf> {
        let mut upstream_failures = 0usize;

        for file_name in &candidates {
            match self.fetch_candidate(file_name).await? {
                FetchOutcome::Found(pdf) => return Ok(pdf),
                FetchOutcome::UpstreamError(_) => upstream_failures += 1,
                FetchOutcome::Absent(_) => {}
            }
        }

        let message = (upstream_failures > 0).then(|| {
            format!(
                "저장소 서버 오류로 확인하지 못한 후보: {}/{}",
                upstream_failures,
                candidates.len()
            )
        });

        Err(AppError::NotFound {
            tried: Some(candidates),
            message,
        })
    }

    async fn resolve_concurrent(&self, candidates: Vec<String>) -> AppResult<FetchedPdf> {
        let resolver = self;
        let mut fetches = pin!(
            stream::iter(candidates)
                .map(move |file_name| async move {
                    let outcome = resolver.fetch_candidate(&file_name).await;
                    (file_name, outcome)
                })
                .buffer_unordered(self.settings.max_concurrent_fetches.max(1))
        );

        // Dropping the stream on return discards the fetches still in flight.
        while let Some((file_name, outcome)) = fetches.next().await {
            match outcome {
                Ok(FetchOutcome::Found(pdf)) => return Ok(pdf),
                Ok(_) => {}
                Err(e) => warn!(file_name = %file_name, error = %e, "Candidate fetch failed"),
            }
        }

        Err(AppError::NotFound {
            tried: None,
            message: Some(NO_PATTERN_MATCHED.to_string()),
        })
    }
}
