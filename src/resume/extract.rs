use base64::Engine;
use lopdf::Document;

use crate::error::Error;

const DATA_URL_PREFIX: &str = "data:application/pdf;base64,";

/// Plain text of every page, in page order, one page after another.
/// Pages whose text cannot be decoded are skipped with a warning.
pub fn pdf_text(bytes: &[u8]) -> Result<String, Error> {
    let t0 = std::time::Instant::now();
    let doc = Document::load_mem(bytes).map_err(|e| Error::Resume(format!("unreadable PDF: {e}")))?;

    let pages = doc.get_pages();
    let mut text = String::new();
    let mut skipped = 0;
    for &number in pages.keys() {
        match doc.extract_text(&[number]) {
            Ok(page) => {
                text.push_str(page.trim_end());
                text.push('\n');
            }
            Err(e) => {
                skipped += 1;
                log::warn!("Skipping resume page {number}: {e}");
            }
        }
    }

    log::debug!(
        "Resume text: {} pages ({skipped} skipped), {} chars in {:.1}ms",
        pages.len(),
        text.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    if text.trim().is_empty() {
        return Err(Error::Resume("PDF contains no extractable text".to_string()));
    }
    Ok(text)
}

/// Decode a base64 PDF, with or without a `data:application/pdf;base64,` prefix.
pub fn decode_base64(data: &str) -> Result<Vec<u8>, Error> {
    let data = data.trim();
    let payload = data.strip_prefix(DATA_URL_PREFIX).unwrap_or(data);
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| Error::Resume(format!("invalid base64 PDF: {e}")))
}

/// `%PDF-` magic, allowing leading whitespace some generators emit.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(b"%PDF-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_prefix_is_optional() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"%PDF-1.7");
        assert_eq!(decode_base64(&encoded).unwrap(), b"%PDF-1.7");
        let url = format!("{DATA_URL_PREFIX}{encoded}");
        assert_eq!(decode_base64(&url).unwrap(), b"%PDF-1.7");
    }

    #[test]
    fn bad_base64_is_a_resume_error() {
        assert!(matches!(decode_base64("not base64!"), Err(Error::Resume(_))));
    }

    #[test]
    fn garbage_is_not_a_pdf() {
        assert!(looks_like_pdf(b"\n%PDF-1.4"));
        assert!(!looks_like_pdf(b"Jane Doe\nSales Director"));
        assert!(matches!(pdf_text(b"Jane Doe"), Err(Error::Resume(_))));
    }
}
