//! Domain models for the exam PDF resolver.

pub mod exam;
pub mod template;

// Re-export commonly used types
pub use exam::{DownloadQuery, DownloadResponse, ExamDescriptor, FetchedPdf, PDF_MIME_TYPE};
pub use template::FilenameTemplate;
