//! Exam descriptor parsed from the download request, and the success envelope.

use actix_web::web;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// MIME type reported for every resolved file.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Raw query parameters of `/api/download`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DownloadQuery {
    /// Exam year, e.g. `2023`.
    #[param(required = true)]
    pub year: Option<String>,
    /// Exam month, e.g. `3`.
    #[param(required = true)]
    pub month: Option<String>,
    /// School grade, e.g. `3`.
    #[param(required = true)]
    pub grade: Option<String>,
    /// Subject name, e.g. `국어`.
    #[param(required = true)]
    pub subject: Option<String>,
    /// Document type: `문제` (questions) or `해설` (answers). Defaults to `문제`.
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
}

impl DownloadQuery {
    /// Collect the known parameters from decoded key/value pairs.
    ///
    /// The first occurrence of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = DownloadQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "year" => &mut query.year,
                "month" => &mut query.month,
                "grade" => &mut query.grade,
                "subject" => &mut query.subject,
                "type" => &mut query.doc_type,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    /// Parse a raw (percent-encoded) query string. Never fails: malformed
    /// input yields whatever parameters could be read, and validation is left
    /// to [`DownloadQuery::into_descriptor`].
    pub fn from_query_string(query: &str) -> Self {
        let pairs = web::Query::<Vec<(String, String)>>::from_query(query)
            .map(web::Query::into_inner)
            .unwrap_or_default();
        Self::from_pairs(pairs)
    }

    /// Validate presence of the required fields and apply the document-type default.
    ///
    /// Empty strings count as missing.
    pub fn into_descriptor(self, default_doc_type: &str) -> AppResult<ExamDescriptor> {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        let (Some(year), Some(month), Some(grade), Some(subject)) = (
            present(self.year),
            present(self.month),
            present(self.grade),
            present(self.subject),
        ) else {
            return Err(AppError::MissingParameters);
        };

        Ok(ExamDescriptor {
            year,
            month,
            grade,
            subject,
            doc_type: present(self.doc_type).unwrap_or_else(|| default_doc_type.to_string()),
        })
    }
}

/// One exam paper, as described by the caller. Fields are taken verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamDescriptor {
    pub year: String,
    pub month: String,
    pub grade: String,
    pub subject: String,
    pub doc_type: String,
}

impl ExamDescriptor {
    /// Look up a field by its template placeholder name.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "year" => Some(&self.year),
            "month" => Some(&self.month),
            "grade" => Some(&self.grade),
            "subject" => Some(&self.subject),
            "docType" => Some(&self.doc_type),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExamDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}년 고{} {}월 {} {}",
            self.year, self.grade, self.month, self.subject, self.doc_type
        )
    }
}

/// A PDF fetched from the storage host.
#[derive(Debug, Clone)]
pub struct FetchedPdf {
    /// Candidate filename that matched (not percent-encoded).
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Success body of `/api/download`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub success: bool,
    pub file_name: String,
    pub mime_type: String,
    /// File content, standard base64 with padding.
    pub base64: String,
    /// Length of the decoded content in bytes.
    pub size: usize,
}

impl From<FetchedPdf> for DownloadResponse {
    fn from(pdf: FetchedPdf) -> Self {
        DownloadResponse {
            success: true,
            size: pdf.bytes.len(),
            base64: STANDARD.encode(&pdf.bytes),
            file_name: pdf.file_name,
            mime_type: PDF_MIME_TYPE.to_string(),
        }
    }
}
