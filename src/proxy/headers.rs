//! Outbound request headers

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};

use super::error::ProxyError;
use crate::config::BrowserProfile;

/// Build the header set sent to the origin
///
/// `Referer` is forwarded verbatim when the caller supplied one and left out
/// otherwise.
pub fn build_outbound_headers(
    profile: &BrowserProfile,
    referer: Option<&str>,
) -> Result<HeaderMap, ProxyError> {
    let mut headers = HeaderMap::with_capacity(4);
    headers.insert(USER_AGENT, header_value("User-Agent", &profile.user_agent)?);
    headers.insert(ACCEPT, header_value("Accept", &profile.accept)?);
    headers.insert(
        ACCEPT_LANGUAGE,
        header_value("Accept-Language", &profile.accept_language)?,
    );
    if let Some(referer) = referer {
        headers.insert(REFERER, header_value("Referer", referer)?);
    }
    Ok(headers)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ProxyError> {
    HeaderValue::from_str(value)
        .map_err(|e| ProxyError::Fetch(format!("Invalid {name} header value: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_headers_without_referer() {
        let headers = build_outbound_headers(&BrowserProfile::default(), None).unwrap();
        assert_eq!(headers.len(), 3);
        assert!(headers[USER_AGENT]
            .to_str()
            .unwrap()
            .starts_with("Mozilla/5.0"));
        assert_eq!(
            headers[ACCEPT],
            "image/avif,image/webp,image/apng,image/*,*/*;q=0.8"
        );
        assert_eq!(headers[ACCEPT_LANGUAGE], "en-US,en;q=0.9");
        assert!(headers.get(REFERER).is_none());
    }

    #[test]
    fn test_referer_forwarded_verbatim() {
        let headers =
            build_outbound_headers(&BrowserProfile::default(), Some("https://site.example/page?a=1"))
                .unwrap();
        assert_eq!(headers[REFERER], "https://site.example/page?a=1");
    }

    #[test]
    fn test_deterministic() {
        let profile = BrowserProfile::default();
        let a = build_outbound_headers(&profile, Some("https://x.example/")).unwrap();
        let b = build_outbound_headers(&profile, Some("https://x.example/")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_illegal_referer_rejected() {
        let err = build_outbound_headers(&BrowserProfile::default(), Some("bad\nvalue"))
            .unwrap_err();
        assert_eq!(err.status(), 500);
        assert!(err.to_string().contains("Referer"));
    }
}
