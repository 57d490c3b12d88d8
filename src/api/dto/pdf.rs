/*
 * Responsibility
 * - PDF endpoint の multipart 入力と JSON 出力
 * - field 名は公開 API の契約 (archivo / pagina / paginas)
 */
use axum::body::Bytes;
use axum::extract::Multipart;
use serde::Serialize;

use crate::error::AppError;

pub const FILE_FIELD: &str = "archivo";
pub const PAGE_FIELD: &str = "pagina";

#[derive(Debug, Default)]
pub struct PdfUpload {
    pub archivo: Option<Bytes>,
    pub pagina: Option<String>,
}

impl PdfUpload {
    /// Drain the multipart body, keeping the fields this API knows about.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut upload = PdfUpload::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            tracing::warn!(error = %e, "failed to read multipart field");
            AppError::missing_fields("malformed multipart body")
        })? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                FILE_FIELD => {
                    let data = field.bytes().await.map_err(|e| {
                        tracing::warn!(error = %e, "failed to read uploaded file");
                        AppError::missing_fields("could not read uploaded file")
                    })?;
                    tracing::debug!(bytes = data.len(), "received upload");
                    upload.archivo = Some(data);
                }
                PAGE_FIELD => {
                    let text = field.text().await.map_err(|e| {
                        tracing::warn!(error = %e, "failed to read page field");
                        AppError::missing_fields("could not read `pagina` field")
                    })?;
                    upload.pagina = Some(text);
                }
                other => tracing::debug!(field = %other, "ignoring multipart field"),
            }
        }

        Ok(upload)
    }

    pub fn require_file(&mut self) -> Result<Bytes, AppError> {
        self.archivo
            .take()
            .filter(|data| !data.is_empty())
            .ok_or_else(|| AppError::missing_fields("a PDF file is required in field `archivo`"))
    }

    pub fn require_page(&mut self) -> Result<String, AppError> {
        self.pagina
            .take()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::missing_fields("field `pagina` is required"))
    }
}

/// Leading integer of `raw`, read the way form values usually are:
/// optional `+`, then digits, trailing junk ignored (`"2.5"` and `"2abc"` are 2).
/// `None` when there are no leading digits or the value is negative.
pub fn parse_page(raw: &str) -> Option<u32> {
    let s = raw.trim_start();
    if s.starts_with('-') {
        return None;
    }
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}

#[derive(Debug, Serialize)]
pub struct PageCountResponse {
    pub paginas: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_takes_leading_integer() {
        assert_eq!(parse_page("2"), Some(2));
        assert_eq!(parse_page("+2"), Some(2));
        assert_eq!(parse_page(" 2 "), Some(2));
        assert_eq!(parse_page("2.5"), Some(2));
        assert_eq!(parse_page("2abc"), Some(2));
        assert_eq!(parse_page("007"), Some(7));
    }

    #[test]
    fn page_without_leading_digits_is_none() {
        assert_eq!(parse_page("abc"), None);
        assert_eq!(parse_page("-1"), None);
        assert_eq!(parse_page("+"), None);
        assert_eq!(parse_page(".5"), None);
        assert_eq!(parse_page("99999999999"), None);
    }
}
