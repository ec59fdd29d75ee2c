//! PDF text extraction.
//!
//! `pdf-extract` can panic on malformed input rather than returning an
//! error, so the call is wrapped in `catch_unwind`. From the caller's point
//! of view extraction never fails: parse errors and panics both degrade to
//! an empty string.

use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

/// Best-effort text extraction from raw PDF bytes.
///
/// Pages are extracted in document order and joined with a blank line
/// between them; the joined result is trimmed. Returns `""` when the bytes
/// cannot be parsed as a PDF.
pub fn extract_text(bytes: &[u8]) -> String {
    let data = bytes.to_vec(); // owned copy for the unwind boundary
    let pages = match panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&data)
    })) {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => {
            warn!("PDF extraction failed: {e}");
            return String::new();
        }
        Err(_) => {
            warn!("PDF extraction panicked (malformed document)");
            return String::new();
        }
    };
    pages.join("\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_return_empty() {
        assert_eq!(extract_text(b"definitely not a pdf"), "");
    }

    #[test]
    fn test_empty_input_returns_empty() {
        assert_eq!(extract_text(&[]), "");
    }

    #[test]
    fn test_truncated_header_returns_empty() {
        assert_eq!(extract_text(b"%PDF-1.7\n1 0 obj\n<< /Type /Catalog"), "");
    }

    #[test]
    fn test_binary_noise_returns_empty() {
        let noise: Vec<u8> = (0..=255).cycle().take(4096).collect();
        assert_eq!(extract_text(&noise), "");
    }
}
