//! Client for the download endpoint.
//!
//! Calls `/api/download`, decodes the base64 payload and writes the PDF to a
//! local directory. Used by the `fetch-exam-pdfs` binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

/// Endpoint used when neither `--api-url` nor `PDF_API_URL` is given.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api/download";

/// Per-request timeout. Resolution may try many candidates upstream.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Subjects offered by the mock exams, in menu order.
pub const SUBJECTS: &[&str] = &[
    "국어",
    "수학",
    "영어",
    "한국사",
    "생활과윤리",
    "윤리와사상",
    "한국지리",
    "세계지리",
    "동아시아사",
    "세계사",
    "경제",
    "정치와법",
    "사회문화",
    "물리학1",
    "화학1",
    "생명과학1",
    "지구과학1",
];

/// Download client errors.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid API URL {0}")]
    InvalidUrl(String),

    #[error("File not found (404)")]
    NotFound,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Server reported failure: {0}")]
    Unsuccessful(String),

    #[error("Invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Invalid file name from server: {0:?}")]
    InvalidFileName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Expand a subject argument: `all`, a 1-based index into [`SUBJECTS`], or a
/// literal subject name.
pub fn select_subjects(input: &str) -> Result<Vec<String>, String> {
    let input = input.trim();

    if input.eq_ignore_ascii_case("all") {
        return Ok(SUBJECTS.iter().map(|s| s.to_string()).collect());
    }

    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        return input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| SUBJECTS.get(idx))
            .map(|s| vec![s.to_string()])
            .ok_or_else(|| format!("Subject number must be between 1 and {}", SUBJECTS.len()));
    }

    if input.is_empty() {
        return Err("Subject must not be empty".to_string());
    }

    Ok(vec![input.to_string()])
}

/// One exam paper to request.
#[derive(Debug, Clone)]
pub struct ExamRequest {
    pub year: String,
    pub month: String,
    pub grade: String,
    pub subject: String,
    pub doc_type: String,
}

/// A decoded PDF returned by the endpoint.
#[derive(Debug, Clone)]
pub struct DownloadedPdf {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Lenient view of the success envelope; anything else is a failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    #[serde(default)]
    success: bool,
    file_name: Option<String>,
    base64: Option<String>,
}

/// HTTP client for `/api/download`.
pub struct DownloadClient {
    client: reqwest::Client,
    api_url: String,
}

impl DownloadClient {
    pub fn new(api_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    /// Request one exam paper and decode it.
    pub async fn fetch(&self, exam: &ExamRequest) -> Result<DownloadedPdf, ClientError> {
        let url = reqwest::Url::parse_with_params(
            &self.api_url,
            &[
                ("year", exam.year.as_str()),
                ("month", exam.month.as_str()),
                ("grade", exam.grade.as_str()),
                ("subject", exam.subject.as_str()),
                ("type", exam.doc_type.as_str()),
            ],
        )
        .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.api_url, e)))?;

        let response = self.client.get(url).send().await?;

        let status = response.status();
        debug!(status = %status.as_u16(), subject = %exam.subject, "Download endpoint replied");

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound);
        }

        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope = match serde_json::from_str::<Envelope>(&body) {
            Ok(envelope) if envelope.success => envelope,
            _ => return Err(ClientError::Unsuccessful(body)),
        };

        let (Some(file_name), Some(payload)) = (envelope.file_name, envelope.base64) else {
            return Err(ClientError::Unsuccessful(body));
        };

        Ok(DownloadedPdf {
            file_name,
            bytes: STANDARD.decode(payload)?,
        })
    }

    /// Fetch an exam paper and save it under `dir`, creating the directory.
    ///
    /// Only the final path component of the server-provided name is used.
    pub async fn download_to(
        &self,
        exam: &ExamRequest,
        dir: &Path,
    ) -> Result<(PathBuf, usize), ClientError> {
        let pdf = self.fetch(exam).await?;

        let name = Path::new(&pdf.file_name)
            .file_name()
            .ok_or_else(|| ClientError::InvalidFileName(pdf.file_name.clone()))?;

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(name);
        tokio::fs::write(&path, &pdf.bytes).await?;

        Ok((path, pdf.bytes.len()))
    }
}
