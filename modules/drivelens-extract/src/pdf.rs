//! PDF text extraction via lopdf, page by page.

use lopdf::Document;

/// Extract text from every page in ascending page order, concatenated
/// with no separator. Each page's trailing newline (added by the text
/// decoder at end of page) is stripped so page boundaries are seamless.
pub fn extract_text(bytes: &[u8]) -> Result<String, String> {
    let doc = Document::load_mem(bytes).map_err(|e| e.to_string())?;

    let mut text = String::new();
    for (&page_number, _) in doc.get_pages().iter() {
        let page_text = doc
            .extract_text(&[page_number])
            .map_err(|e| format!("page {page_number}: {e}"))?;
        text.push_str(page_text.trim_end_matches('\n'));
    }
    Ok(text)
}
