//! Image relay
//!
//! Fetches remote images on behalf of browsers and returns them as base64
//! data URIs, sidestepping CORS and hotlink protection.

pub mod bootstrap;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod proxy;
pub mod server;
