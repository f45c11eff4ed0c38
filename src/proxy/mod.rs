//! Image proxy
//!
//! Fetches a remote image on behalf of the caller and returns it as a base64
//! data URI. Each call is independent: one outbound attempt, nothing cached.

mod error;
mod fetch;
mod headers;
mod request;
mod result;
mod snippet;

pub use error::{ErrorKind, ProxyError};
pub use fetch::{build_client, fetch_image, is_image_content_type};
pub use headers::build_outbound_headers;
pub use request::ProxyRequest;
pub use result::{ImagePayload, ProxyBody, ProxyResult};
pub use snippet::{decode_snippet, SNIPPET_MAX_CHARS, SNIPPET_READ_BYTES};

use crate::config::ProxyConfig;
use crate::logger;

/// Handle one `/proxy` request given its raw query string
pub async fn handle(client: &reqwest::Client, config: &ProxyConfig, query: Option<&str>) -> ProxyResult {
    let request = match ProxyRequest::from_query(query) {
        Ok(request) => request,
        Err(err) => {
            logger::log_debug(&format!("[Proxy] Rejected request: {err}"));
            return err.into();
        }
    };

    match fetch_image(client, &request, config).await {
        Ok(payload) => {
            logger::log_debug(&format!(
                "[Proxy] {} -> {} ({} bytes)",
                request.target_url,
                payload.content_type,
                payload.body.len()
            ));
            payload.into()
        }
        Err(err) => {
            logger::log_warning(&format!(
                "[Proxy] {} for {}: {err}",
                err.kind(),
                request.target_url
            ));
            err.into()
        }
    }
}
