/*
 * Responsibility
 * - POST /api/pdf/contar_paginas, POST /api/pdf/pagina_pdf
 * - multipart (archivo / pagina) を受け取り services::pdf に委譲
 * - upload はメモリ上のみ (disk に一時ファイルを残さない)
 */
use axum::{
    Json,
    extract::Multipart,
    http::header,
    response::{IntoResponse, Response},
};

use crate::{
    api::{
        dto::pdf::{PageCountResponse, PdfUpload, parse_page},
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    services::pdf,
};

pub async fn contar_paginas(
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    multipart: Multipart,
) -> Result<Json<PageCountResponse>, AppError> {
    let mut upload = PdfUpload::from_multipart(multipart).await?;
    let data = upload.require_file()?;

    let paginas = pdf::count_pages(data).await?;
    tracing::info!(user_id = ctx.user_id, paginas, "counted pdf pages");

    Ok(Json(PageCountResponse { paginas }))
}

pub async fn pagina_pdf(
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let mut upload = PdfUpload::from_multipart(multipart).await?;
    let data = upload.require_file()?;
    let raw_page = upload.require_page()?;

    let page = match parse_page(&raw_page) {
        Some(page) => page,
        None => {
            // Still report the document size; an unreadable PDF wins over a bad page.
            let total = pdf::count_pages(data).await?;
            return Err(AppError::PageOutOfRange {
                page: raw_page,
                total,
            });
        }
    };

    let out = pdf::extract_page(data, page).await?;
    tracing::info!(user_id = ctx.user_id, page, bytes = out.len(), "extracted pdf page");

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"pagina_{page}.pdf\""),
        ),
    ];
    Ok((headers, out).into_response())
}
