//! Proxy outcome and its JSON representation

use base64::Engine;
use serde::Serialize;

use super::error::{ErrorKind, ProxyError};

/// Verified image bytes as received from the origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub content_type: String,
    pub body: Vec<u8>,
}

impl ImagePayload {
    /// `data:<content-type>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.body);
        format!("data:{};base64,{encoded}", self.content_type)
    }
}

/// Result of one `/proxy` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyResult {
    Success {
        content_type: String,
        data_uri: String,
    },
    Failure {
        status: u16,
        kind: ErrorKind,
        message: String,
        content_type: Option<String>,
        snippet: Option<String>,
    },
}

impl ProxyResult {
    pub const fn status(&self) -> u16 {
        match self {
            Self::Success { .. } => 200,
            Self::Failure { status, .. } => *status,
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// JSON body sent to the client
    pub fn body(&self) -> ProxyBody<'_> {
        match self {
            Self::Success {
                content_type,
                data_uri,
            } => ProxyBody {
                ok: true,
                error: None,
                content_type: Some(content_type),
                base64: Some(data_uri),
                snippet: None,
            },
            Self::Failure {
                message,
                content_type,
                snippet,
                ..
            } => ProxyBody {
                ok: false,
                error: Some(message),
                content_type: content_type.as_deref(),
                base64: None,
                snippet: snippet.as_deref(),
            },
        }
    }
}

impl From<ImagePayload> for ProxyResult {
    fn from(payload: ImagePayload) -> Self {
        let data_uri = payload.to_data_uri();
        Self::Success {
            content_type: payload.content_type,
            data_uri,
        }
    }
}

impl From<ProxyError> for ProxyResult {
    fn from(err: ProxyError) -> Self {
        let status = err.status();
        let kind = err.kind();
        let message = err.to_string();
        let (content_type, snippet) = match err {
            ProxyError::NotAnImage {
                content_type,
                snippet,
            } => (Some(content_type), snippet),
            _ => (None, None),
        };
        Self::Failure {
            status,
            kind,
            message,
            content_type,
            snippet,
        }
    }
}

impl From<Result<ImagePayload, ProxyError>> for ProxyResult {
    fn from(result: Result<ImagePayload, ProxyError>) -> Self {
        match result {
            Ok(payload) => payload.into(),
            Err(err) => err.into(),
        }
    }
}

/// Wire shape of `/proxy` responses
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyBody<'a> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base64: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_uri() {
        let payload = ImagePayload {
            content_type: "image/png".to_string(),
            body: vec![0x89, b'P', b'N', b'G'],
        };
        assert_eq!(payload.to_data_uri(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_success_body() {
        let result = ProxyResult::from(ImagePayload {
            content_type: "image/gif".to_string(),
            body: b"GIF89a".to_vec(),
        });
        assert_eq!(result.status(), 200);
        assert!(result.is_success());
        assert_eq!(
            serde_json::to_value(result.body()).unwrap(),
            json!({
                "ok": true,
                "contentType": "image/gif",
                "base64": "data:image/gif;base64,R0lGODlh",
            })
        );
    }

    #[test]
    fn test_not_an_image_body() {
        let result = ProxyResult::from(ProxyError::NotAnImage {
            content_type: "text/html".to_string(),
            snippet: Some("<html>".to_string()),
        });
        assert_eq!(result.status(), 400);
        assert_eq!(
            serde_json::to_value(result.body()).unwrap(),
            json!({
                "ok": false,
                "error": "Remote URL did not return an image (content-type != image/*)",
                "contentType": "text/html",
                "snippet": "<html>",
            })
        );
    }

    #[test]
    fn test_plain_failure_body() {
        let result = ProxyResult::from(ProxyError::Timeout);
        assert_eq!(result.status(), 504);
        assert_eq!(
            serde_json::to_value(result.body()).unwrap(),
            json!({ "ok": false, "error": "Fetch timed out" })
        );
    }
}
