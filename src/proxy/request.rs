//! Inbound `/proxy` parameters

use url::Url;

use super::error::ProxyError;

/// Target of a single proxy request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
    pub target_url: Url,
    pub referer: Option<String>,
}

impl ProxyRequest {
    /// Build a request from the raw query string (`url=...&referer=...`)
    ///
    /// The first occurrence of each key wins; empty values count as absent.
    pub fn from_query(query: Option<&str>) -> Result<Self, ProxyError> {
        let raw_url = query_param(query, "url").ok_or(ProxyError::MissingParameter)?;
        let referer = query_param(query, "referer");
        Self::new(&raw_url, referer)
    }

    pub fn new(raw_url: &str, referer: Option<String>) -> Result<Self, ProxyError> {
        if raw_url.is_empty() {
            return Err(ProxyError::MissingParameter);
        }
        let target_url = Url::parse(raw_url).map_err(ProxyError::InvalidUrl)?;
        Ok(Self {
            target_url,
            referer: referer.filter(|r| !r.is_empty()),
        })
    }
}

fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}
