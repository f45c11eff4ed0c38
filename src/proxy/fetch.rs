//! Outbound fetch with deadline, content-type gate and size cap

use hyper::ext::ReasonPhrase;
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect, Client, Response};

use super::error::ProxyError;
use super::headers::build_outbound_headers;
use super::request::ProxyRequest;
use super::result::ImagePayload;
use super::snippet::read_snippet;
use crate::config::ProxyConfig;

/// Content-type gate: the declared MIME type must start with `image/`
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Build the outbound client used for every proxy request
///
/// Origins are contacted directly; `HTTP_PROXY`-style variables are ignored.
pub fn build_client(config: &ProxyConfig) -> Result<Client, ProxyError> {
    Client::builder()
        .no_proxy()
        .redirect(redirect_policy(config.max_redirects))
        .build()
        .map_err(ProxyError::from)
}

/// Follow at most `max_redirects` hops, each one staying on http(s)
///
/// With a limit of zero the redirect response itself is returned to the caller.
fn redirect_policy(max_redirects: usize) -> redirect::Policy {
    if max_redirects == 0 {
        return redirect::Policy::none();
    }
    redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() > max_redirects {
            let message = format!("Too many redirects (limit {max_redirects})");
            attempt.error(message)
        } else if !matches!(attempt.url().scheme(), "http" | "https") {
            let message = format!("Redirect to unsupported scheme '{}'", attempt.url().scheme());
            attempt.error(message)
        } else {
            attempt.follow()
        }
    })
}

/// Fetch the target and return its bytes if they pass every check
///
/// The deadline covers connect, headers and body. When it fires the exchange
/// future is dropped, which closes the outbound connection and its timer.
pub async fn fetch_image(
    client: &Client,
    request: &ProxyRequest,
    config: &ProxyConfig,
) -> Result<ImagePayload, ProxyError> {
    let headers = build_outbound_headers(&config.browser, request.referer.as_deref())?;
    let exchange = async {
        let response = client
            .get(request.target_url.clone())
            .headers(headers)
            .send()
            .await?;
        validate_response(response, config.max_bytes).await
    };

    match tokio::time::timeout(config.timeout(), exchange).await {
        Ok(result) => result,
        Err(_elapsed) => Err(ProxyError::Timeout),
    }
}

async fn validate_response(
    mut response: Response,
    max_bytes: u64,
) -> Result<ImagePayload, ProxyError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ProxyError::Upstream {
            status: status.as_u16(),
            reason: status_text(&response),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !is_image_content_type(&content_type) {
        let snippet = read_snippet(&mut response).await;
        return Err(ProxyError::NotAnImage {
            content_type,
            snippet,
        });
    }

    if response.content_length().is_some_and(|len| len > max_bytes) {
        return Err(ProxyError::PayloadTooLarge { limit: max_bytes });
    }

    let body = read_capped(&mut response, max_bytes).await?;
    Ok(ImagePayload { content_type, body })
}

/// Reason phrase as sent by the origin, or the canonical one when it sent
/// the standard text
fn status_text(response: &Response) -> String {
    match response.extensions().get::<ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
    }
}

/// Buffer the body, giving up as soon as it grows past `max_bytes`
async fn read_capped(response: &mut Response, max_bytes: u64) -> Result<Vec<u8>, ProxyError> {
    let mut body = Vec::new();
    let mut received: u64 = 0;
    while let Some(chunk) = response.chunk().await? {
        received = received.saturating_add(u64::try_from(chunk.len()).unwrap_or(u64::MAX));
        if received > max_bytes {
            return Err(ProxyError::PayloadTooLarge { limit: max_bytes });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_content_types() {
        assert!(is_image_content_type("image/png"));
        assert!(is_image_content_type("image/svg+xml; charset=utf-8"));
        assert!(is_image_content_type("Image/JPEG"));
        assert!(!is_image_content_type("text/html"));
        assert!(!is_image_content_type("application/json"));
        assert!(!is_image_content_type(""));
        assert!(!is_image_content_type("image"));
        assert!(!is_image_content_type(" image/png"));
    }

    #[test]
    fn test_non_ascii_content_type_does_not_panic() {
        assert!(!is_image_content_type("imagé/png"));
    }

    fn response_with(status: u16, reason: Option<&'static str>) -> Response {
        let mut builder = hyper::Response::builder().status(status);
        if let Some(reason) = reason {
            builder = builder.extension(ReasonPhrase::from_static(reason.as_bytes()));
        }
        Response::from(builder.body("").unwrap())
    }

    #[test]
    fn test_status_text_prefers_origin_reason() {
        assert_eq!(status_text(&response_with(404, Some("Gone Fishing"))), "Gone Fishing");
        assert_eq!(status_text(&response_with(520, Some("Unknown Error"))), "Unknown Error");
    }

    #[test]
    fn test_status_text_falls_back_to_canonical() {
        assert_eq!(status_text(&response_with(404, None)), "Not Found");
        assert_eq!(status_text(&response_with(520, None)), "");
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(&ProxyConfig::default()).is_ok());
        let no_redirects = ProxyConfig {
            max_redirects: 0,
            ..ProxyConfig::default()
        };
        assert!(build_client(&no_redirects).is_ok());
    }
}
