use super::{DocumentFormat, ExtractError};

/// Extracts the text of every page and joins the pages with `\n`.
/// Leading and trailing whitespace is trimmed.
pub fn extract_text(data: &[u8]) -> Result<String, ExtractError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(data).map_err(|e| {
        ExtractError::Unreadable {
            format: DocumentFormat::Pdf,
            reason: e.to_string(),
        }
    })?;

    Ok(pages.join("\n").trim().to_string())
}
