/*
 * Responsibility
 * - PDF の page 数取得 / 1 page 抽出 (lopdf に委譲)
 * - parse/save は CPU bound なので blocking pool で実行する
 * - HTTP には依存しない (handler 側で AppError に変換)
 */
use axum::body::Bytes;
use lopdf::Document;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to load pdf: {0}")]
    Load(#[from] lopdf::Error),
    #[error("failed to save pdf: {0}")]
    Save(String),
    #[error("page {page} out of range 1..={total}")]
    PageOutOfRange { page: u32, total: u32 },
    #[error("pdf task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Number of pages in the uploaded document.
pub async fn count_pages(data: Bytes) -> Result<u32, PdfError> {
    tokio::task::spawn_blocking(move || page_count(&data)).await?
}

/// One-page document holding page `page` (1-based) of the upload.
pub async fn extract_page(data: Bytes, page: u32) -> Result<Vec<u8>, PdfError> {
    tokio::task::spawn_blocking(move || single_page(&data, page)).await?
}

fn page_count(data: &[u8]) -> Result<u32, PdfError> {
    let doc = Document::load_mem(data)?;
    Ok(doc.get_pages().len() as u32)
}

fn single_page(data: &[u8], page: u32) -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::load_mem(data)?;

    let total = doc.get_pages().len() as u32;
    if page == 0 || page > total {
        return Err(PdfError::PageOutOfRange { page, total });
    }

    let others: Vec<u32> = (1..=total).filter(|n| *n != page).collect();
    doc.delete_pages(&others);
    // Fonts/images only referenced by the dropped pages.
    doc.prune_objects();

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| PdfError::Save(e.to_string()))?;
    Ok(out)
}
