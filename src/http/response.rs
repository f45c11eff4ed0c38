//! HTTP response building module
//!
//! Builders for the responses the relay sends, decoupled from routing.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderValue};
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Methods advertised in `Allow`
const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Build a JSON response; `HEAD` keeps the headers and drops the body
pub fn build_json_response<T: Serialize>(
    status: u16,
    body: &T,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let payload = match serde_json::to_vec(body) {
        Ok(bytes) => bytes,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize JSON body: {e}"));
            return build_500_response();
        }
    };
    let content_length = payload.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(payload)
    };

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
        .header(header::CONTENT_LENGTH, content_length)
        .header(header::CACHE_CONTROL, "no-store")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(header::ALLOW, ALLOWED_METHODS)
        .header(header::ACCESS_CONTROL_MAX_AGE, "86400")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a static file response
pub fn build_file_response(data: Vec<u8>, content_type: &str, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(data)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, content_length)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build health check response
pub fn build_health_response(text: &'static str) -> Response<Full<Bytes>> {
    text_response(StatusCode::OK, text, None)
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    text_response(StatusCode::NOT_FOUND, "404 Not Found", None)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    text_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "405 Method Not Allowed",
        Some((header::ALLOW, ALLOWED_METHODS)),
    )
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<Full<Bytes>> {
    text_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "500 Internal Server Error",
        None,
    )
}

fn text_response(
    status: StatusCode,
    text: &'static str,
    extra: Option<(header::HeaderName, &'static str)>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8");
    if let Some((name, value)) = extra {
        builder = builder.header(name, value);
    }
    builder.body(Full::new(Bytes::from(text))).unwrap_or_else(|e| {
        log_build_error(status.as_str(), &e);
        Response::new(Full::new(Bytes::from(text)))
    })
}

/// Headers added to every response: `Server` and, when enabled, CORS
pub fn apply_common_headers<B>(response: &mut Response<B>, enable_cors: bool, server_name: &str) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(server_name) {
        headers.insert(header::SERVER, value);
    }
    if enable_cors {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, OPTIONS"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        );
    }
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_json_response() {
        let resp = build_json_response(413, &serde_json::json!({ "ok": false }), false);
        assert_eq!(resp.status(), 413);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"ok":false}"#);
    }

    #[tokio::test]
    async fn test_json_head_has_no_body() {
        let resp = build_json_response(200, &serde_json::json!({ "ok": true }), true);
        assert_eq!(resp.headers()[header::CONTENT_LENGTH], "11");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[test]
    fn test_invalid_status_becomes_500() {
        let resp = build_json_response(42, &serde_json::json!({}), false);
        assert_eq!(resp.status(), 500);
    }

    #[test]
    fn test_common_headers() {
        let mut resp = build_404_response();
        apply_common_headers(&mut resp, true, "image-relay");
        let headers = resp.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
        assert_eq!(headers[header::SERVER], "image-relay");
    }

    #[test]
    fn test_cors_disabled() {
        let mut resp = build_options_response();
        apply_common_headers(&mut resp, false, "image-relay");
        assert_eq!(resp.status(), 204);
        assert!(resp
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[test]
    fn test_405_allow_header() {
        let resp = build_405_response();
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()[header::ALLOW], "GET, HEAD, OPTIONS");
    }
}
