//! Logger module
//!
//! Provides logging utilities for the relay including:
//! - Server lifecycle logging
//! - Access logging in combined or JSON format
//! - Leveled error, warning, info and debug messages
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::Level;

use crate::config::Config;
use chrono::Local;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    let level = config.logging.level.parse::<Level>().unwrap_or_else(|e| {
        eprintln!("[WARN] {e}, falling back to info");
        Level::Info
    });
    writer::init(
        level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Before `init()` runs, everything up to info is printed
fn enabled(level: Level) -> bool {
    writer::get().map_or(level <= Level::Info, |w| w.enabled(level))
}

fn write(level: Level, message: &str) {
    if !enabled(level) {
        return;
    }
    let line = format!(
        "{} [{}] {message}",
        Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"),
        level.label()
    );
    match (writer::get(), level) {
        (Some(w), Level::Error | Level::Warn) => w.write_error(&line),
        (Some(w), _) => w.write_info(&line),
        (None, Level::Error | Level::Warn) => eprintln!("{line}"),
        (None, _) => println!("{line}"),
    }
}

pub fn log_error(message: &str) {
    write(Level::Error, message);
}

pub fn log_warning(message: &str) {
    write(Level::Warn, message);
}

pub fn log_info(message: &str) {
    write(Level::Info, message);
}

pub fn log_debug(message: &str) {
    write(Level::Debug, message);
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    log_info("======================================");
    log_info("Image relay started successfully");
    log_info(&format!("Listening on: http://{addr}"));
    log_info(&format!("Proxy endpoint: http://{addr}/proxy?url=<image-url>"));
    log_info(&format!(
        "Fetch timeout: {} ms, max image size: {} bytes",
        config.proxy.timeout_ms, config.proxy.max_bytes
    ));
    log_info(&format!("Static root: {}", config.static_files.root));
    log_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        log_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        log_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        log_info(&format!("Error log: {path}"));
    }
    log_info("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}
