//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, route matching,
//! common headers and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::proxy;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{self, HeaderMap, HeaderName};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// Path of the image proxy endpoint
pub const PROXY_PATH: &str = "/proxy";

/// Request head fields needed after dispatch, owned so no borrow of the
/// request is held across the outbound fetch
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub version: Version,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestContext {
    fn from_request<B>(req: &Request<B>) -> Self {
        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            version: req.version(),
            referer: header_text(req.headers(), &header::REFERER),
            user_agent: header_text(req.headers(), &header::USER_AGENT),
        }
    }

    fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }
}

fn header_text(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Main entry point for HTTP request handling
///
/// Only the request head is inspected, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let ctx = RequestContext::from_request(&req);
    drop(req);

    let mut response = match ctx.method {
        Method::OPTIONS => http::build_options_response(),
        Method::GET | Method::HEAD => route_request(&ctx, &state).await,
        _ => {
            logger::log_warning(&format!("Method not allowed: {} {}", ctx.method, ctx.path));
            http::build_405_response()
        }
    };

    http::apply_common_headers(
        &mut response,
        state.config.http.enable_cors,
        &state.config.http.server_name,
    );

    if state.cached_access_log.load(Ordering::Relaxed) {
        log_access(ctx, &response, peer_addr, started, &state);
    }

    Ok(response)
}

/// Route request based on path and configuration
async fn route_request(ctx: &RequestContext, state: &AppState) -> Response<Full<Bytes>> {
    if ctx.path == PROXY_PATH {
        let result = proxy::handle(&state.client, &state.config.proxy, ctx.query.as_deref()).await;
        return http::build_json_response(result.status(), &result.body(), ctx.is_head());
    }

    let health = &state.config.health;
    if health.enabled && (ctx.path == health.liveness_path || ctx.path == health.readiness_path) {
        return http::build_health_response("ok");
    }

    static_files::serve(&state.config.static_files, &ctx.path, ctx.is_head()).await
}

fn log_access(
    ctx: RequestContext,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
    state: &AppState,
) {
    let mut entry = AccessLogEntry::new(peer_addr.to_string(), ctx.method.to_string(), ctx.path);
    entry.query = ctx.query;
    entry.http_version = version_label(ctx.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = ctx.referer;
    entry.user_agent = ctx.user_agent;
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.config.logging.access_log_format);
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}
