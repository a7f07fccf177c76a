//! Filename templates for candidate PDF names on the storage host.
//!
//! A template is literal text with `{name}` placeholders. The recognised
//! names are `year`, `month`, `grade`, `subject` and `docType`.

use super::ExamDescriptor;

/// Placeholder names a template may reference.
pub const PLACEHOLDERS: &[&str] = &["year", "month", "grade", "subject", "docType"];

/// A filename convention, e.g. `{year}년-고{grade}-{month}월-모의고사-{subject}-{docType}.pdf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate(String);

impl FilenameTemplate {
    /// Wrap a template without validating it.
    ///
    /// Unknown placeholders are left in the output verbatim when rendered.
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Build a template, rejecting unknown or unterminated placeholders.
    pub fn parse(template: &str) -> Result<Self, String> {
        let mut rest = template;
        while let Some(start) = rest.find('{') {
            let after = &rest[start + 1..];
            let end = after
                .find('}')
                .ok_or_else(|| "unterminated placeholder".to_string())?;
            let name = &after[..end];
            if !PLACEHOLDERS.contains(&name) {
                return Err(format!(
                    "unknown placeholder '{{{}}}' (expected one of: {})",
                    name,
                    PLACEHOLDERS.join(", ")
                ));
            }
            rest = &after[end + 1..];
        }
        Ok(Self(template.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitute the descriptor's fields into the template.
    ///
    /// Substitution is single-pass: a field value that itself looks like a
    /// placeholder is copied literally.
    pub fn render(&self, exam: &ExamDescriptor) -> String {
        let mut out = String::with_capacity(self.0.len() + 32);
        let mut rest = self.0.as_str();

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                return out;
            };
            match exam.field(&after[..end]) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[start..start + end + 2]),
            }
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        out
    }
}
