//! Diagnostic snippets for non-image responses
//!
//! Best effort only: any read failure means "no snippet", never an error.

/// Raw bytes read from the body before decoding
pub const SNIPPET_READ_BYTES: usize = 512;
/// Characters kept after decoding
pub const SNIPPET_MAX_CHARS: usize = 300;

/// Decode the start of a body as text, tolerating invalid UTF-8
pub fn decode_snippet(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(SNIPPET_READ_BYTES)];
    let text: String = String::from_utf8_lossy(head)
        .chars()
        .take(SNIPPET_MAX_CHARS)
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Read just enough of the response body to build a snippet
pub async fn read_snippet(response: &mut reqwest::Response) -> Option<String> {
    let mut head = Vec::with_capacity(SNIPPET_READ_BYTES);
    while head.len() < SNIPPET_READ_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => head.extend_from_slice(&chunk),
            Ok(None) => break,
            Err(_) => return None,
        }
    }
    decode_snippet(&head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_has_no_snippet() {
        assert_eq!(decode_snippet(b""), None);
    }

    #[test]
    fn test_short_text() {
        assert_eq!(
            decode_snippet(b"<html>blocked</html>").as_deref(),
            Some("<html>blocked</html>")
        );
    }

    #[test]
    fn test_truncated_to_max_chars() {
        let body = "a".repeat(2000);
        let snippet = decode_snippet(body.as_bytes()).unwrap();
        assert_eq!(snippet.chars().count(), SNIPPET_MAX_CHARS);
    }

    #[test]
    fn test_invalid_utf8_tolerated() {
        let snippet = decode_snippet(&[0x3c, 0xff, 0xfe, 0x3e]).unwrap();
        assert!(snippet.starts_with('<'));
        assert!(snippet.ends_with('>'));
        assert!(snippet.contains('\u{FFFD}'));
    }

    #[test]
    fn test_only_first_bytes_decoded() {
        // 600 bytes of two-byte characters: only 256 fit in the read window
        let body = "é".repeat(300);
        let snippet = decode_snippet(body.as_bytes()).unwrap();
        assert_eq!(snippet.chars().count(), 256);
    }
}
